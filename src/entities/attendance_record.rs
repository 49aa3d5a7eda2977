//! Attendance record entity - One status (and optional note) for one student
//! or teacher on one date.
//!
//! The unique index on `(subject, subject_id, date)` created in
//! [`crate::config::database::create_tables`] keeps at most one record per
//! subject per day; submissions upsert against it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whose attendance a record describes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AttendanceSubject {
    /// `subject_id` references `students.id`
    #[sea_orm(string_value = "student")]
    Student,
    /// `subject_id` references `teachers.id`
    #[sea_orm(string_value = "teacher")]
    Teacher,
}

/// Daily attendance status, stored with the school's own labels.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AttendanceStatus {
    /// Hadir
    #[sea_orm(string_value = "Hadir")]
    Present,
    /// Sakit
    #[sea_orm(string_value = "Sakit")]
    Sick,
    /// Izin
    #[sea_orm(string_value = "Izin")]
    Permission,
    /// Alfa
    #[sea_orm(string_value = "Alfa")]
    Absent,
}

impl AttendanceStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 4] = [Self::Present, Self::Sick, Self::Permission, Self::Absent];

    /// Label stored in the database and shown to staff.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Present => "Hadir",
            Self::Sick => "Sakit",
            Self::Permission => "Izin",
            Self::Absent => "Alfa",
        }
    }

    /// Single-letter column header used in the monthly report.
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Present => "H",
            Self::Sick => "S",
            Self::Permission => "I",
            Self::Absent => "A",
        }
    }

    /// Sick and Permission carry a short reason; staff are prompted for it.
    #[must_use]
    pub const fn requires_note(self) -> bool {
        matches!(self, Self::Sick | Self::Permission)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Attendance record database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    /// Surrogate key
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student or teacher
    pub subject: AttendanceSubject,
    /// ID of the student or teacher, depending on `subject`
    pub subject_id: i64,
    /// Calendar day the record is for
    pub date: Date,
    /// Status for that day
    pub status: AttendanceStatus,
    /// Reason for Sick/Permission, empty otherwise
    pub note: String,
}

/// Attendance records reference students or teachers polymorphically, so no
/// foreign-key relation is declared.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
