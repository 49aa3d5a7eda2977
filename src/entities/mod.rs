//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod attendance_record;
pub mod class_room;
pub mod school_settings;
pub mod student;
pub mod teacher;

// Re-export specific types to avoid conflicts
pub use attendance_record::{
    AttendanceStatus, AttendanceSubject, Column as AttendanceColumn, Entity as AttendanceRecord,
    Model as AttendanceRecordModel,
};
pub use class_room::{Column as ClassRoomColumn, Entity as ClassRoom, Model as ClassRoomModel};
pub use school_settings::{
    Column as SchoolSettingsColumn, Entity as SchoolSettings, Model as SchoolSettingsModel,
};
pub use student::{Column as StudentColumn, Entity as Student, Model as StudentModel};
pub use teacher::{Column as TeacherColumn, Entity as Teacher, Model as TeacherModel};
