//! Student entity - A pupil enrolled in exactly one class.
//!
//! The class link is the `class_id` foreign key; the class name shown in the
//! UI is always derived through the relation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Student database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Unique identifier for the student
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Nomor Induk Siswa (school-issued student number)
    pub nis: String,
    /// Full name of the student
    pub name: String,
    /// ID of the class this student belongs to
    #[sea_orm(indexed)]
    pub class_id: i64,
    /// Inactive students stay in the roster list but are not taken in attendance
    pub is_active: bool,
}

/// Defines relationships between Student and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each student belongs to one class
    #[sea_orm(
        belongs_to = "super::class_room::Entity",
        from = "Column::ClassId",
        to = "super::class_room::Column::Id"
    )]
    ClassRoom,
}

impl Related<super::class_room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassRoom.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
