//! Teacher business logic - Handles the teacher roster.
//!
//! Deleting a teacher removes its attendance history in the same transaction.

use crate::{
    entities::{AttendanceRecord, AttendanceSubject, Teacher, attendance_record, teacher},
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

/// Editable teacher fields, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherDetails {
    /// Staff number, required
    pub nip: String,
    /// Full name, required
    pub name: String,
    /// Position, optional
    pub role: String,
}

impl TeacherDetails {
    fn normalized(self) -> Result<Self> {
        let nip = self.nip.trim().to_string();
        let name = self.name.trim().to_string();
        if nip.is_empty() {
            return Err(Error::validation("Teacher NIP cannot be empty"));
        }
        if name.is_empty() {
            return Err(Error::validation("Teacher name cannot be empty"));
        }
        Ok(Self {
            nip,
            name,
            role: self.role.trim().to_string(),
        })
    }
}

/// Retrieves every teacher ordered alphabetically by name.
pub async fn get_all_teachers(db: &DatabaseConnection) -> Result<Vec<teacher::Model>> {
    Teacher::find()
        .order_by_asc(teacher::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a teacher by its unique ID.
pub async fn get_teacher_by_id(
    db: &DatabaseConnection,
    teacher_id: i64,
) -> Result<Option<teacher::Model>> {
    Teacher::find_by_id(teacher_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new teacher.
pub async fn create_teacher(
    db: &DatabaseConnection,
    details: TeacherDetails,
) -> Result<teacher::Model> {
    let details = details.normalized()?;

    let teacher = teacher::ActiveModel {
        nip: Set(details.nip),
        name: Set(details.name),
        role: Set(details.role),
        ..Default::default()
    };

    let result = teacher.insert(db).await?;
    info!(teacher_id = result.id, "Created teacher");
    Ok(result)
}

/// Replaces the NIP, name and role of a teacher.
pub async fn update_teacher(
    db: &DatabaseConnection,
    teacher_id: i64,
    details: TeacherDetails,
) -> Result<teacher::Model> {
    let details = details.normalized()?;
    let existing = get_teacher_by_id(db, teacher_id)
        .await?
        .ok_or(Error::TeacherNotFound { id: teacher_id })?;

    let mut active_model: teacher::ActiveModel = existing.into();
    active_model.nip = Set(details.nip);
    active_model.name = Set(details.name);
    active_model.role = Set(details.role);

    active_model.update(db).await.map_err(Into::into)
}

/// Deletes a teacher together with all of its attendance records.
pub async fn delete_teacher(db: &DatabaseConnection, teacher_id: i64) -> Result<teacher::Model> {
    let txn = db.begin().await?;

    let teacher = Teacher::find_by_id(teacher_id)
        .one(&txn)
        .await?
        .ok_or(Error::TeacherNotFound { id: teacher_id })?;

    let removed = AttendanceRecord::delete_many()
        .filter(attendance_record::Column::Subject.eq(AttendanceSubject::Teacher))
        .filter(attendance_record::Column::SubjectId.eq(teacher_id))
        .exec(&txn)
        .await?;

    Teacher::delete_by_id(teacher_id).exec(&txn).await?;
    txn.commit().await?;

    info!(
        teacher_id,
        attendance_removed = removed.rows_affected,
        "Deleted teacher"
    );
    Ok(teacher)
}
