//! Student business logic - Handles all student roster operations.
//!
//! Students belong to exactly one class through `class_id`. Deleting a student
//! also deletes its attendance history in the same database transaction.

use crate::{
    core::class_room,
    entities::{AttendanceRecord, AttendanceSubject, Student, attendance_record, student},
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

/// Editable student fields, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDetails {
    /// Student number, required
    pub nis: String,
    /// Full name, required
    pub name: String,
    /// Class the student is enrolled in
    pub class_id: i64,
}

impl StudentDetails {
    fn normalized(self) -> Result<Self> {
        let nis = self.nis.trim().to_string();
        let name = self.name.trim().to_string();
        if nis.is_empty() {
            return Err(Error::validation("Student NIS cannot be empty"));
        }
        if name.is_empty() {
            return Err(Error::validation("Student name cannot be empty"));
        }
        Ok(Self {
            nis,
            name,
            class_id: self.class_id,
        })
    }
}

/// Retrieves every student ordered alphabetically by name.
pub async fn get_all_students(db: &DatabaseConnection) -> Result<Vec<student::Model>> {
    Student::find()
        .order_by_asc(student::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every student of a class, active or not, ordered by name.
pub async fn get_students_in_class(
    db: &DatabaseConnection,
    class_id: i64,
) -> Result<Vec<student::Model>> {
    Student::find()
        .filter(student::Column::ClassId.eq(class_id))
        .order_by_asc(student::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the active students of a class ordered by name. This is the
/// roster attendance is taken against.
pub async fn get_active_students_in_class(
    db: &DatabaseConnection,
    class_id: i64,
) -> Result<Vec<student::Model>> {
    Student::find()
        .filter(student::Column::ClassId.eq(class_id))
        .filter(student::Column::IsActive.eq(true))
        .order_by_asc(student::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a student by its unique ID.
pub async fn get_student_by_id(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<Option<student::Model>> {
    Student::find_by_id(student_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_student_by_id`] but a missing student is an error.
pub async fn require_student(db: &DatabaseConnection, student_id: i64) -> Result<student::Model> {
    get_student_by_id(db, student_id)
        .await?
        .ok_or(Error::StudentNotFound { id: student_id })
}

/// Searches students by case-insensitive name substring or NIS substring,
/// optionally restricted to one class. An empty query matches everyone.
pub async fn search_students(
    db: &DatabaseConnection,
    query: &str,
    class_id: Option<i64>,
) -> Result<Vec<student::Model>> {
    let students = match class_id {
        Some(id) => get_students_in_class(db, id).await?,
        None => get_all_students(db).await?,
    };

    let needle = query.trim().to_lowercase();
    Ok(students
        .into_iter()
        .filter(|s| {
            needle.is_empty() || s.name.to_lowercase().contains(&needle) || s.nis.contains(&needle)
        })
        .collect())
}

/// Creates a new, active student in an existing class.
pub async fn create_student(
    db: &DatabaseConnection,
    details: StudentDetails,
) -> Result<student::Model> {
    let details = details.normalized()?;
    class_room::require_class(db, details.class_id).await?;

    let student = student::ActiveModel {
        nis: Set(details.nis),
        name: Set(details.name),
        class_id: Set(details.class_id),
        is_active: Set(true),
        ..Default::default()
    };

    let result = student.insert(db).await?;
    info!(student_id = result.id, class_id = result.class_id, "Created student");
    Ok(result)
}

/// Replaces the NIS, name and class of a student.
pub async fn update_student(
    db: &DatabaseConnection,
    student_id: i64,
    details: StudentDetails,
) -> Result<student::Model> {
    edit_student(db, student_id, details, None).await
}

/// Replaces the NIS, name and class of a student and, when `is_active` is
/// given, its active flag. All fields are written in one `UPDATE`.
pub async fn edit_student(
    db: &DatabaseConnection,
    student_id: i64,
    details: StudentDetails,
    is_active: Option<bool>,
) -> Result<student::Model> {
    let details = details.normalized()?;
    let existing = require_student(db, student_id).await?;
    class_room::require_class(db, details.class_id).await?;

    let mut active_model: student::ActiveModel = existing.into();
    active_model.nis = Set(details.nis);
    active_model.name = Set(details.name);
    active_model.class_id = Set(details.class_id);
    if let Some(is_active) = is_active {
        active_model.is_active = Set(is_active);
    }

    active_model.update(db).await.map_err(Into::into)
}

/// Marks a student active or inactive.
pub async fn set_student_active(
    db: &DatabaseConnection,
    student_id: i64,
    is_active: bool,
) -> Result<student::Model> {
    let existing = require_student(db, student_id).await?;
    let mut active_model: student::ActiveModel = existing.into();
    active_model.is_active = Set(is_active);
    active_model.update(db).await.map_err(Into::into)
}

/// Deletes a student together with all of its attendance records.
///
/// Both deletes run in one transaction; either the student and its history
/// are gone or nothing changed.
pub async fn delete_student(db: &DatabaseConnection, student_id: i64) -> Result<student::Model> {
    let txn = db.begin().await?;

    let student = Student::find_by_id(student_id)
        .one(&txn)
        .await?
        .ok_or(Error::StudentNotFound { id: student_id })?;

    let removed = AttendanceRecord::delete_many()
        .filter(attendance_record::Column::Subject.eq(AttendanceSubject::Student))
        .filter(attendance_record::Column::SubjectId.eq(student_id))
        .exec(&txn)
        .await?;

    Student::delete_by_id(student_id).exec(&txn).await?;
    txn.commit().await?;

    info!(
        student_id,
        attendance_removed = removed.rows_affected,
        "Deleted student"
    );
    Ok(student)
}
