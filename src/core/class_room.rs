//! Class business logic - Handles all class-related operations.
//!
//! Provides functions for creating, retrieving, renaming and deleting classes.
//! Students reference a class by id, so a rename never detaches them.

use crate::{
    config::school::ClassSeed,
    entities::{ClassRoom, Student, class_room, student},
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

/// Editable class fields, shared by create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassDetails {
    /// Class name, required
    pub name: String,
    /// Class teacher name
    pub teacher_name: String,
    /// Class teacher NIP
    pub teacher_nip: String,
    /// Headmaster name
    pub headmaster_name: String,
    /// Headmaster NIP
    pub headmaster_nip: String,
}

impl ClassDetails {
    fn normalized(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::validation("Class name cannot be empty"));
        }
        Ok(Self {
            name,
            teacher_name: self.teacher_name.trim().to_string(),
            teacher_nip: self.teacher_nip.trim().to_string(),
            headmaster_name: self.headmaster_name.trim().to_string(),
            headmaster_nip: self.headmaster_nip.trim().to_string(),
        })
    }
}

impl From<&ClassSeed> for ClassDetails {
    fn from(seed: &ClassSeed) -> Self {
        Self {
            name: seed.name.clone(),
            teacher_name: seed.teacher_name.clone(),
            teacher_nip: seed.teacher_nip.clone(),
            headmaster_name: seed.headmaster_name.clone(),
            headmaster_nip: seed.headmaster_nip.clone(),
        }
    }
}

/// Retrieves all classes ordered alphabetically by name.
pub async fn get_all_classes(db: &DatabaseConnection) -> Result<Vec<class_room::Model>> {
    ClassRoom::find()
        .order_by_asc(class_room::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a class by its unique ID.
pub async fn get_class_by_id(
    db: &DatabaseConnection,
    class_id: i64,
) -> Result<Option<class_room::Model>> {
    ClassRoom::find_by_id(class_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a class by its exact name.
pub async fn get_class_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<class_room::Model>> {
    ClassRoom::find()
        .filter(class_room::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_class_by_id`] but a missing class is an error.
pub async fn require_class(db: &DatabaseConnection, class_id: i64) -> Result<class_room::Model> {
    get_class_by_id(db, class_id)
        .await?
        .ok_or_else(|| Error::ClassNotFound {
            name: class_id.to_string(),
        })
}

/// Creates a new class after checking the name is present and not taken.
pub async fn create_class(
    db: &DatabaseConnection,
    details: ClassDetails,
) -> Result<class_room::Model> {
    let details = details.normalized()?;

    if get_class_by_name(db, &details.name).await?.is_some() {
        return Err(Error::validation(format!(
            "A class named '{}' already exists",
            details.name
        )));
    }

    let class = class_room::ActiveModel {
        name: Set(details.name),
        teacher_name: Set(details.teacher_name),
        teacher_nip: Set(details.teacher_nip),
        headmaster_name: Set(details.headmaster_name),
        headmaster_nip: Set(details.headmaster_nip),
        ..Default::default()
    };

    let result = class.insert(db).await?;
    info!(class_id = result.id, name = %result.name, "Created class");
    Ok(result)
}

/// Replaces every editable field of a class.
pub async fn update_class(
    db: &DatabaseConnection,
    class_id: i64,
    details: ClassDetails,
) -> Result<class_room::Model> {
    let details = details.normalized()?;
    let existing = require_class(db, class_id).await?;

    if let Some(other) = get_class_by_name(db, &details.name).await? {
        if other.id != class_id {
            return Err(Error::validation(format!(
                "A class named '{}' already exists",
                details.name
            )));
        }
    }

    let mut active_model: class_room::ActiveModel = existing.into();
    active_model.name = Set(details.name);
    active_model.teacher_name = Set(details.teacher_name);
    active_model.teacher_nip = Set(details.teacher_nip);
    active_model.headmaster_name = Set(details.headmaster_name);
    active_model.headmaster_nip = Set(details.headmaster_nip);

    active_model.update(db).await.map_err(Into::into)
}

/// Number of students (active or not) assigned to a class.
pub async fn count_students_in_class(db: &DatabaseConnection, class_id: i64) -> Result<u64> {
    Student::find()
        .filter(student::Column::ClassId.eq(class_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Deletes a class. Classes that still have students are refused so that no
/// student is left pointing at a missing class.
pub async fn delete_class(db: &DatabaseConnection, class_id: i64) -> Result<class_room::Model> {
    let class = require_class(db, class_id).await?;

    let students = count_students_in_class(db, class_id).await?;
    if students > 0 {
        return Err(Error::ClassNotEmpty {
            name: class.name,
            students,
        });
    }

    ClassRoom::delete_by_id(class_id).exec(db).await?;
    info!(class_id, name = %class.name, "Deleted class");
    Ok(class)
}

/// Creates each seeded class whose name does not exist yet.
/// Returns how many classes were created.
pub async fn seed_classes(db: &DatabaseConnection, seeds: &[ClassSeed]) -> Result<usize> {
    let mut created = 0;
    for seed in seeds {
        if get_class_by_name(db, &seed.name).await?.is_some() {
            continue;
        }
        create_class(db, ClassDetails::from(seed)).await?;
        created += 1;
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_class_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_class(
            &db,
            ClassDetails {
                name: "   ".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_class_rejects_duplicate_name() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_class(&db, "TK A1").await?;

        let result = create_test_class(&db, "TK A1").await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_classes_sorted() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_class(&db, "TK B1").await?;
        create_test_class(&db, "TK A2").await?;
        create_test_class(&db, "TK A1").await?;

        let names: Vec<String> = get_all_classes(&db)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["TK A1", "TK A2", "TK B1"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_rename_keeps_students_attached() -> Result<()> {
        let db = setup_test_db().await?;
        let class = create_test_class(&db, "TK A1").await?;
        let student = create_test_student(&db, "Ani", class.id).await?;

        let renamed = update_class(
            &db,
            class.id,
            ClassDetails {
                name: "TK A1 Pelangi".to_string(),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(renamed.name, "TK A1 Pelangi");

        let students = crate::core::student::get_students_in_class(&db, class.id).await?;
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, student.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_class_rejects_taken_name() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_class(&db, "TK A1").await?;
        let b = create_test_class(&db, "TK B1").await?;

        let result = update_class(
            &db,
            b.id,
            ClassDetails {
                name: "TK A1".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_class_with_students_is_refused() -> Result<()> {
        let db = setup_test_db().await?;
        let class = create_test_class(&db, "TK A1").await?;
        create_test_student(&db, "Ani", class.id).await?;

        let result = delete_class(&db, class.id).await;
        assert!(matches!(
            result,
            Err(Error::ClassNotEmpty { students: 1, .. })
        ));
        assert!(get_class_by_id(&db, class.id).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_empty_class() -> Result<()> {
        let db = setup_test_db().await?;
        let class = create_test_class(&db, "TK A1").await?;

        delete_class(&db, class.id).await?;
        assert!(get_class_by_id(&db, class.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_classes_skips_existing() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_class(&db, "TK A1").await?;

        let seeds = vec![
            ClassSeed {
                name: "TK A1".to_string(),
                teacher_name: String::new(),
                teacher_nip: String::new(),
                headmaster_name: String::new(),
                headmaster_nip: String::new(),
            },
            ClassSeed {
                name: "TK B1".to_string(),
                teacher_name: "Budi".to_string(),
                teacher_nip: String::new(),
                headmaster_name: String::new(),
                headmaster_nip: String::new(),
            },
        ];

        assert_eq!(seed_classes(&db, &seeds).await?, 1);
        assert_eq!(seed_classes(&db, &seeds).await?, 0);
        let b1 = get_class_by_name(&db, "TK B1").await?.unwrap();
        assert_eq!(b1.teacher_name, "Budi");

        Ok(())
    }
}
