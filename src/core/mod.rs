//! Core business logic, independent of the command-line surface.

/// Roles, capabilities and the acting user
pub mod access;
/// Per-period fee breakdowns and student statements
pub mod breakdown;
/// Class registry
pub mod class;
/// Fee schedule management
pub mod fees;
/// Naira amounts: parsing, formatting and kobo conversion
pub mod money;
/// Payment recording and aggregation
pub mod payment;
/// Terms, academic years and the current-period resolver
pub mod period;
/// Registration number allocation
pub mod registration;
/// Status-filtered listings, reports, receipts and the dashboard
pub mod report;
/// Fee status engine
pub mod status;
/// Student registration, lookup and listing
pub mod student;
/// Teacher registry
pub mod teacher;
/// Staff users
pub mod user;
