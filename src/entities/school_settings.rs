//! School settings entity - Singleton row holding the school's display name.
//! The row always lives at [`SETTINGS_ID`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed primary key of the only settings row
pub const SETTINGS_ID: i32 = 1;

/// School settings database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "school_settings")]
pub struct Model {
    /// Always [`SETTINGS_ID`]
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Name used in headers and report letterheads
    pub school_name: String,
    /// When the settings were last saved
    pub updated_at: DateTime,
}

/// `SchoolSettings` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
