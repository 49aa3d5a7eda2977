//! Core business logic - framework-agnostic attendance operations.
//!
//! Nothing in here knows about Discord. Every function takes a database
//! connection and plain arguments and returns structured data that the bot
//! layer formats.

/// Class management
pub mod class_room;
/// Dashboard summary and weekly trend
pub mod dashboard;
/// Student management
pub mod student;
/// Teacher management
pub mod teacher;
/// Roster provider shared by students and teachers
pub mod roster;
/// Daily attendance sheets and submission
pub mod attendance;
/// Monthly aggregation
pub mod monthly;
/// Monthly class report
pub mod report;
/// School settings singleton
pub mod settings;
