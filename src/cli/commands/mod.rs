//! Command handlers. Each returns the text to print.

/// Bootstrap, staff accounts, classes and teachers
pub mod admin;
/// Fee schedule
pub mod fees;
/// Payments and receipts
pub mod payments;
/// Status, reports and the dashboard
pub mod reports;
/// Student registration, statements and listings
pub mod students;
