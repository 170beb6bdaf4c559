//! Shared test utilities for the school ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::{
        access::Role,
        class::class_exists,
        payment::{self, NewPayment},
        period::{AcademicYear, Term},
        student::{NewStudent, register_student},
        user::create_user,
    },
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use std::path::PathBuf;

/// Short name used for registration numbers in tests.
pub const TEST_SHORT_NAME: &str = "AAM";

/// Classes created by [`seed_test_classes`].
pub const TEST_CLASSES: [&str; 4] = ["JSS 1", "JSS 2", "SS 1", "SS 2"];

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A `SQLite` file in the temp directory for tests that need several
/// connections to one database. The file is removed on drop.
pub struct TempDatabase {
    path: PathBuf,
}

impl TempDatabase {
    /// Reserves a fresh file named after `name` and the process id.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "school-ledger-{name}-{}.db",
            std::process::id()
        ));
        let temp = Self { path };
        temp.remove_files();
        temp
    }

    /// Opens a new connection pool on the file, creating it if needed.
    pub async fn connect(&self) -> Result<DatabaseConnection> {
        let url = format!("sqlite://{}?mode=rwc", self.path.display());
        Database::connect(url).await.map_err(Into::into)
    }

    fn remove_files(&self) {
        for suffix in ["", "-journal", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", self.path.display()));
        }
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        self.remove_files();
    }
}

/// The 2024/2025 academic year most fixtures live in.
#[must_use]
pub const fn year_2024() -> AcademicYear {
    AcademicYear::starting(2024)
}

/// A fixed date inside First Term 2024/2025.
#[must_use]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 16).unwrap_or_default()
}

/// Adds every class in [`TEST_CLASSES`] that does not exist yet.
pub async fn seed_test_classes(db: &DatabaseConnection) -> Result<()> {
    for name in TEST_CLASSES {
        if !class_exists(db, name).await? {
            crate::core::class::add_class(db, name).await?;
        }
    }
    Ok(())
}

/// Enrollment details with sensible defaults.
///
/// # Defaults
/// * term: First Term
/// * date of birth: 2012-03-04
/// * gender: "Female"
/// * admission date: [`test_date`]
#[must_use]
pub fn new_student(name: &str, class_name: &str, academic_year: AcademicYear) -> NewStudent {
    NewStudent {
        name: name.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(2012, 3, 4).unwrap_or_default(),
        gender: "Female".to_string(),
        address: None,
        phone: None,
        email: None,
        class_name: class_name.to_string(),
        term: Term::FirstTerm,
        academic_year,
        admission_date: test_date(),
    }
}

/// Inserts a student row directly under a fixed registration number,
/// bypassing allocation.
pub async fn insert_student_with_number(
    db: &DatabaseConnection,
    reg_number: &str,
) -> Result<entities::student::Model> {
    entities::student::ActiveModel {
        reg_number: Set(reg_number.to_string()),
        name: Set(format!("Student {reg_number}")),
        date_of_birth: Set(NaiveDate::from_ymd_opt(2012, 3, 4).unwrap_or_default()),
        gender: Set("Male".to_string()),
        address: Set(None),
        phone: Set(None),
        email: Set(None),
        class_name: Set("JSS 1".to_string()),
        term: Set(Term::FirstTerm.as_str().to_string()),
        academic_year: Set(year_2024().to_string()),
        admission_date: Set(test_date()),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Sets up a database with an officer and one student registered in
/// `class_name` for First Term 2024/2025.
/// Returns (db, recorder, student).
pub async fn setup_with_student(
    class_name: &str,
) -> Result<(
    DatabaseConnection,
    entities::user::Model,
    entities::student::Model,
)> {
    let db = setup_test_db().await?;
    seed_test_classes(&db).await?;
    if !class_exists(&db, class_name).await? {
        crate::core::class::add_class(&db, class_name).await?;
    }
    let recorder = create_user(&db, "bursar", Role::Officer).await?;
    let student = register_student(
        &db,
        TEST_SHORT_NAME,
        new_student("Amina Musa", class_name, year_2024()),
        5,
    )
    .await?;
    Ok((db, recorder, student))
}

/// Records a First Term 2024/2025 payment dated [`test_date`].
pub async fn record_test_payment(
    db: &DatabaseConnection,
    reg_number: &str,
    recorded_by: i64,
    amount: Decimal,
) -> Result<entities::payment::Model> {
    record_payment_for(db, reg_number, recorded_by, amount, Term::FirstTerm, year_2024()).await
}

/// Records a payment for a custom period.
pub async fn record_payment_for(
    db: &DatabaseConnection,
    reg_number: &str,
    recorded_by: i64,
    amount: Decimal,
    term: Term,
    academic_year: AcademicYear,
) -> Result<entities::payment::Model> {
    payment::record_payment(
        db,
        NewPayment {
            student_reg_number: reg_number.to_string(),
            amount,
            term,
            academic_year,
            payment_date: test_date(),
            recorded_by,
        },
    )
    .await
}

/// Routes `tracing` output through the test harness. Safe to call from
/// several tests.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("school_ledger=debug"))
        .with_test_writer()
        .try_init();
}
