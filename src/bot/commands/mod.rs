//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Daily attendance sheets for students and teachers
pub mod attendance;

/// Class management commands
pub mod classes;

/// General utility commands
pub mod general;

/// Dashboard and monthly recap commands
pub mod reports;

/// School settings commands
pub mod settings;

/// Student management commands
pub mod students;

/// Teacher management commands
pub mod teachers;

// Export commands
pub use attendance::*;
pub use classes::*;
pub use general::*;
pub use reports::*;
pub use settings::*;
pub use students::*;
pub use teachers::*;
