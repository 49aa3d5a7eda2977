//! Unified error type for the attendance service.
//!
//! Store failures, validation failures and framework failures all funnel into
//! [`Error`] so that the core layer and the bot layer share one `Result` alias.

use thiserror::Error;

/// Every failure the service can surface to a caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A required field was empty or otherwise rejected before touching the store
    #[error("Validation error: {message}")]
    Validation {
        /// Which field failed and why
        message: String,
    },

    /// The store rejected a query or mutation
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// No class with the given name or id
    #[error("Class '{name}' not found")]
    ClassNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// A class still has students assigned and cannot be removed
    #[error("Class '{name}' still has {students} student(s) assigned")]
    ClassNotEmpty {
        /// Class name
        name: String,
        /// Number of students still assigned
        students: u64,
    },

    /// No student with the given id
    #[error("Student {id} not found")]
    StudentNotFound {
        /// Student id
        id: i64,
    },

    /// No teacher with the given id
    #[error("Teacher {id} not found")]
    TeacherNotFound {
        /// Teacher id
        id: i64,
    },

    /// The entity is not part of the roster the sheet was built from
    #[error("Entity {id} is not on this attendance sheet")]
    NotInRoster {
        /// Entity id
        id: i64,
    },

    /// Some roster entities have no status on the sheet
    #[error("Attendance sheet is missing entries for {missing:?}")]
    IncompleteSheet {
        /// Entity ids without an entry
        missing: Vec<i64>,
    },

    /// A date argument was not `YYYY-MM-DD`
    #[error("Invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate {
        /// Raw input
        input: String,
    },

    /// A month argument was not `YYYY-MM`
    #[error("Invalid month '{input}', expected YYYY-MM")]
    InvalidMonth {
        /// Raw input
        input: String,
    },

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Formatting into a `String` buffer failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
