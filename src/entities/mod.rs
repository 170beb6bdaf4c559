//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

/// Expected fee per class and period
pub mod fee_schedule;
/// Recorded payments
pub mod payment;
/// Classes
pub mod school_class;
/// Enrolled students
pub mod student;
/// Teachers
pub mod teacher;
/// Staff accounts
pub mod user;

// Re-export specific types to avoid conflicts
pub use fee_schedule::{
    Column as FeeScheduleColumn, Entity as FeeSchedule, Model as FeeScheduleModel,
};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use school_class::{
    Column as SchoolClassColumn, Entity as SchoolClass, Model as SchoolClassModel,
};
pub use student::{Column as StudentColumn, Entity as Student, Model as StudentModel};
pub use teacher::{Column as TeacherColumn, Entity as Teacher, Model as TeacherModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
