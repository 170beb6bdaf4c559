//! `school-ledger` - fee administration for a secondary school
//!
//! This crate tracks students, the fee schedule per class and term, and the
//! payments made against it. Fee status is always computed from fresh
//! aggregates; registration numbers are allocated per academic year and
//! protected by a store-level uniqueness constraint.

#![deny(
    unsafe_code,
    unused_must_use,
    unreachable_patterns,
    rustdoc::broken_intra_doc_links,
)]
// No panics in ledger code; tests opt out locally.
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::dbg_macro,
    clippy::needless_pass_by_value,
    clippy::match_same_arms,
    clippy::too_many_lines,
    clippy::wildcard_imports,
    rust_2018_idioms,
)]
#![allow(
    // Names like `student::StudentFilter` repeat their module on purpose
    clippy::module_name_repetitions,
    // `# Errors` sections only where the failure modes are not obvious
    clippy::missing_errors_doc,
)]

// Note: `missing_docs` is set to `warn` instead of `deny` because
// `clap` derive output and entity macros don't carry docs everywhere.

/// Command-line surface - argument parsing, capability checks and output
pub mod cli;
/// Configuration management for database and school settings
pub mod config;
/// Core business logic - fee status, registration, breakdowns and reports
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;

#[cfg(test)]
pub mod test_utils;
