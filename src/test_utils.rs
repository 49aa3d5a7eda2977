//! Shared test utilities for the attendance service.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        attendance::{NotePrompt, NoteRequest},
        class_room::{self, ClassDetails},
        student::{self, StudentDetails},
        teacher::{self, TeacherDetails},
    },
    entities::{self, AttendanceStatus, AttendanceSubject, attendance_record},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::collections::VecDeque;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test class with only a name; teacher and headmaster are blank.
pub async fn create_test_class(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::class_room::Model> {
    class_room::create_class(
        db,
        ClassDetails {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Creates an active test student.
///
/// # Defaults
/// * `nis`: `"NIS-<name>"`
pub async fn create_test_student(
    db: &DatabaseConnection,
    name: &str,
    class_id: i64,
) -> Result<entities::student::Model> {
    create_custom_student(db, &format!("NIS-{name}"), name, class_id).await
}

/// Creates an active test student with a specific NIS.
pub async fn create_custom_student(
    db: &DatabaseConnection,
    nis: &str,
    name: &str,
    class_id: i64,
) -> Result<entities::student::Model> {
    student::create_student(
        db,
        StudentDetails {
            nis: nis.to_string(),
            name: name.to_string(),
            class_id,
        },
    )
    .await
}

/// Creates a test teacher.
///
/// # Defaults
/// * `nip`: `"NIP-<name>"`
/// * `role`: `"Guru Kelas"`
pub async fn create_test_teacher(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::teacher::Model> {
    teacher::create_teacher(
        db,
        TeacherDetails {
            nip: format!("NIP-{name}"),
            name: name.to_string(),
            role: "Guru Kelas".to_string(),
        },
    )
    .await
}

/// Inserts one attendance record with an empty note, bypassing the sheet.
pub async fn insert_test_record(
    db: &DatabaseConnection,
    subject: AttendanceSubject,
    subject_id: i64,
    date: NaiveDate,
    status: AttendanceStatus,
) -> Result<attendance_record::Model> {
    attendance_record::ActiveModel {
        subject: Set(subject),
        subject_id: Set(subject_id),
        date: Set(date),
        status: Set(status),
        note: Set(String::new()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// A [`NotePrompt`] that replays canned answers and remembers what it was
/// asked. Once the answers run out every prompt is treated as cancelled.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<Option<String>>,
    /// Requests received, oldest first
    pub asked: Vec<NoteRequest>,
}

impl ScriptedPrompt {
    /// Prompt answering with `answers` in order.
    pub fn new(answers: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }
}

impl NotePrompt for ScriptedPrompt {
    async fn ask_note(&mut self, request: &NoteRequest) -> Result<Option<String>> {
        self.asked.push(request.clone());
        Ok(self.answers.pop_front().flatten())
    }
}
