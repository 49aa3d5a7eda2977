//! Database configuration module.
//!
//! This module handles database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. The attendance table additionally gets the unique
//! `(subject, subject_id, date)` index that submissions upsert against.

use crate::entities::{
    AttendanceColumn, AttendanceRecord, ClassRoom, SchoolSettings, Student, Teacher,
};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::debug;

/// Local `SQLite` file used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/attendance.sqlite?mode=rwc";

/// Name of the unique index enforcing one record per subject per day.
pub const ATTENDANCE_UNIQUE_INDEX: &str = "idx_attendance_subject_date";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Directory that must exist before `SQLite` can create the database file.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(':') {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set. The
/// file's directory is created when missing.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    debug!(%database_url, "Connecting to database");
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table_for<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all necessary database tables and indexes if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table_for(db, &schema, ClassRoom).await?;
    create_table_for(db, &schema, Student).await?;
    create_table_for(db, &schema, Teacher).await?;
    create_table_for(db, &schema, AttendanceRecord).await?;
    create_table_for(db, &schema, SchoolSettings).await?;

    let unique_attendance = Index::create()
        .if_not_exists()
        .name(ATTENDANCE_UNIQUE_INDEX)
        .table(AttendanceRecord)
        .col(AttendanceColumn::Subject)
        .col(AttendanceColumn::SubjectId)
        .col(AttendanceColumn::Date)
        .unique()
        .to_owned();
    db.execute(builder.build(&unique_attendance)).await?;

    Ok(())
}
