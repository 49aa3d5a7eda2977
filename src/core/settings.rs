//! School settings business logic.
//!
//! Settings are a single row at [`SETTINGS_ID`]. Nothing is cached: every read
//! goes to the store, so a change made by one staff member is visible to the
//! next command anyone runs.

use crate::{
    entities::{SchoolSettings, school_settings, school_settings::SETTINGS_ID},
    errors::{Error, Result},
};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::info;

/// Effective school settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Name shown in headers and on report letterheads
    pub school_name: String,
    /// When the stored row was last saved; `None` when running on defaults
    pub updated_at: Option<NaiveDateTime>,
}

/// Loads the stored settings, falling back to `default_name` when none were
/// saved yet.
pub async fn load_school_settings(db: &DatabaseConnection, default_name: &str) -> Result<Settings> {
    let stored = SchoolSettings::find_by_id(SETTINGS_ID).one(db).await?;

    Ok(stored.map_or_else(
        || Settings {
            school_name: default_name.to_string(),
            updated_at: None,
        },
        |row| Settings {
            school_name: row.school_name,
            updated_at: Some(row.updated_at),
        },
    ))
}

/// Saves a new school name, creating the settings row on first use.
///
/// An empty name is rejected before the store is touched.
pub async fn update_school_name(
    db: &DatabaseConnection,
    school_name: &str,
) -> Result<school_settings::Model> {
    let school_name = school_name.trim();
    if school_name.is_empty() {
        return Err(Error::validation("School name cannot be empty"));
    }
    let now = Utc::now().naive_utc();

    let existing = SchoolSettings::find_by_id(SETTINGS_ID).one(db).await?;
    let saved = if let Some(row) = existing {
        let mut active_model: school_settings::ActiveModel = row.into();
        active_model.school_name = Set(school_name.to_string());
        active_model.updated_at = Set(now);
        active_model.update(db).await?
    } else {
        school_settings::ActiveModel {
            id: Set(SETTINGS_ID),
            school_name: Set(school_name.to_string()),
            updated_at: Set(now),
        }
        .insert(db)
        .await?
    };

    info!(school_name = %saved.school_name, "Updated school settings");
    Ok(saved)
}
