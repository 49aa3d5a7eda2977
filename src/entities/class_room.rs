//! Class room entity - Represents a class (rombongan belajar) in the school.
//!
//! Each class has a unique name plus the supervising teacher and headmaster
//! identities printed on its monthly report. Students reference a class by id.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Class room database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "class_rooms")]
pub struct Model {
    /// Unique identifier for the class
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the class (e.g., "TK A1")
    #[sea_orm(unique)]
    pub name: String,
    /// Name of the class teacher (wali kelas)
    pub teacher_name: String,
    /// NIP of the class teacher
    pub teacher_nip: String,
    /// Name of the headmaster signing the report
    pub headmaster_name: String,
    /// NIP of the headmaster
    pub headmaster_nip: String,
}

/// Defines relationships between `ClassRoom` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One class has many students
    #[sea_orm(has_many = "super::student::Entity")]
    Students,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
