//! Roster provider - the ordered set of people an attendance operation covers.
//!
//! A daily roster is either the active students of one class or every
//! teacher; the member list used for monthly totals also keeps inactive
//! students.
//! Both are flattened into [`RosterEntry`] so the sheet, submission and
//! aggregation code is written once for both kinds of subject.

use crate::{
    core::{class_room, student, teacher},
    entities::{AttendanceSubject, student as student_entity, teacher as teacher_entity},
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Which roster an attendance operation runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RosterScope {
    /// Active students of the class with this id
    Class(i64),
    /// All teachers
    Teachers,
}

impl RosterScope {
    /// Subject kind stored on the attendance records of this roster.
    #[must_use]
    pub const fn subject(self) -> AttendanceSubject {
        match self {
            Self::Class(_) => AttendanceSubject::Student,
            Self::Teachers => AttendanceSubject::Teacher,
        }
    }
}

/// One person on a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Student or teacher id
    pub id: i64,
    /// Display name
    pub name: String,
    /// NIS for students, NIP for teachers
    pub code: String,
    /// Teacher role, `None` for students
    pub detail: Option<String>,
}

impl From<student_entity::Model> for RosterEntry {
    fn from(model: student_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.nis,
            detail: None,
        }
    }
}

impl From<teacher_entity::Model> for RosterEntry {
    fn from(model: teacher_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.nip,
            detail: Some(model.role),
        }
    }
}

/// Loads the roster for `scope`, ordered by name.
///
/// A class scope whose class does not exist is an error rather than an empty
/// roster.
pub async fn load_roster(db: &DatabaseConnection, scope: RosterScope) -> Result<Vec<RosterEntry>> {
    match scope {
        RosterScope::Class(class_id) => {
            class_room::require_class(db, class_id).await?;
            let students = student::get_active_students_in_class(db, class_id).await?;
            Ok(students.into_iter().map(RosterEntry::from).collect())
        }
        RosterScope::Teachers => {
            let teachers = teacher::get_all_teachers(db).await?;
            Ok(teachers.into_iter().map(RosterEntry::from).collect())
        }
    }
}

/// Loads every member of `scope`, inactive students included, ordered by name.
///
/// Monthly totals and reports use this so a student deactivated later keeps
/// their rows for the months they attended.
pub async fn load_members(db: &DatabaseConnection, scope: RosterScope) -> Result<Vec<RosterEntry>> {
    match scope {
        RosterScope::Class(class_id) => {
            class_room::require_class(db, class_id).await?;
            let students = student::get_students_in_class(db, class_id).await?;
            Ok(students.into_iter().map(RosterEntry::from).collect())
        }
        RosterScope::Teachers => load_roster(db, scope).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_class_roster_ordered_by_name() -> Result<()> {
        let db = setup_test_db().await?;
        let class = create_test_class(&db, "TK A1").await?;
        create_test_student(&db, "Citra", class.id).await?;
        create_test_student(&db, "Ani", class.id).await?;

        let roster = load_roster(&db, RosterScope::Class(class.id)).await?;
        let names: Vec<&str> = roster.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Ani", "Citra"]);
        assert!(roster.iter().all(|e| e.detail.is_none()));

        Ok(())
    }

    #[tokio::test]
    async fn test_teacher_roster_carries_role() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_teacher(&db, "Siti").await?;

        let roster = load_roster(&db, RosterScope::Teachers).await?;
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].detail.as_deref(), Some("Guru Kelas"));

        Ok(())
    }

    #[tokio::test]
    async fn test_members_include_inactive_students() -> Result<()> {
        let db = setup_test_db().await?;
        let class = create_test_class(&db, "TK A1").await?;
        let ani = create_test_student(&db, "Ani", class.id).await?;
        create_test_student(&db, "Budi", class.id).await?;
        student::set_student_active(&db, ani.id, false).await?;

        let roster = load_roster(&db, RosterScope::Class(class.id)).await?;
        let members = load_members(&db, RosterScope::Class(class.id)).await?;

        assert_eq!(roster.len(), 1);
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, ani.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_class_is_error() -> Result<()> {
        let db = setup_test_db().await?;
        let result = load_roster(&db, RosterScope::Class(99)).await;
        assert!(matches!(result, Err(Error::ClassNotFound { .. })));
        Ok(())
    }

    #[test]
    fn test_scope_subject() {
        assert_eq!(RosterScope::Class(1).subject(), AttendanceSubject::Student);
        assert_eq!(RosterScope::Teachers.subject(), AttendanceSubject::Teacher);
    }
}
