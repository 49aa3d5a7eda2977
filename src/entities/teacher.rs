//! Teacher entity - A member of staff whose daily attendance is recorded.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Teacher database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    /// Unique identifier for the teacher
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Nomor Induk Pegawai (staff number)
    pub nip: String,
    /// Full name of the teacher
    pub name: String,
    /// Role or position (e.g., "Guru Kelas", "Kepala Sekolah")
    pub role: String,
}

/// Teacher has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
