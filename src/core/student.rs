//! Student business logic - registration, lookup, editing and listing.
//!
//! Registration allocates a number and inserts the student in one
//! transaction. When the insert collides with a number claimed concurrently,
//! or the store reports the database locked by a concurrent writer, the
//! transaction is rolled back and allocation is retried, up to the configured
//! budget.

use crate::{
    core::{
        class::class_exists,
        period::{AcademicYear, Term},
        registration::{NextInSequence, NumberSource},
    },
    entities::{Student, student},
    errors::{Error, Result, is_retryable_conflict},
};
use chrono::NaiveDate;
use sea_orm::{
    Condition, DatabaseTransaction, PaginatorTrait, QueryOrder, QuerySelect, Set,
    TransactionTrait, prelude::*,
};
use tracing::{info, instrument, warn};

/// Details of a student to enroll.
#[derive(Debug, Clone)]
pub struct NewStudent {
    /// Full name
    pub name: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Gender as entered
    pub gender: String,
    /// Home address
    pub address: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Class to enroll into; must exist
    pub class_name: String,
    /// First term the student attends
    pub term: Term,
    /// Academic year of enrollment; scopes the registration number
    pub academic_year: AcademicYear,
    /// Day the student was admitted
    pub admission_date: NaiveDate,
}

/// Editable student details. The registration number never changes.
#[derive(Debug, Clone)]
pub struct StudentUpdate {
    /// Full name
    pub name: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Gender as entered
    pub gender: String,
    /// Home address; blank clears it
    pub address: Option<String>,
    /// Contact phone; blank clears it
    pub phone: Option<String>,
    /// Contact email; blank clears it
    pub email: Option<String>,
    /// Class; must exist
    pub class_name: String,
    /// Term of enrollment
    pub term: Term,
    /// Academic year of enrollment
    pub academic_year: AcademicYear,
}

/// Filters for [`find_students`]. `None` means "any".
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    /// Exact class name
    pub class_name: Option<String>,
    /// Term of enrollment
    pub term: Option<Term>,
    /// Substring of the name or registration number
    pub search: Option<String>,
}

fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Registers a new student under a freshly allocated registration number.
///
/// # Errors
/// * `Validation` for empty required fields or an unknown class
/// * `AllocationExhausted` if every attempt collided with another registration
/// * `SequenceOverflow` if the year's numbers are used up
/// * `Database` on store failure; nothing is written in that case
pub async fn register_student(
    db: &DatabaseConnection,
    short_name: &str,
    new: NewStudent,
    max_attempts: u32,
) -> Result<student::Model> {
    register_student_with(db, short_name, new, max_attempts, &mut NextInSequence).await
}

/// [`register_student`] with numbers proposed by `numbers`.
///
/// Each attempt runs in its own transaction: check the class, take a number,
/// insert. An attempt that hits a duplicate key or a locked database is
/// rolled back and repeated, at most `max_attempts` times.
///
/// # Errors
/// As [`register_student`].
#[instrument(skip(db, new, numbers), fields(class = %new.class_name, year = %new.academic_year))]
pub async fn register_student_with<S>(
    db: &DatabaseConnection,
    short_name: &str,
    new: NewStudent,
    max_attempts: u32,
    numbers: &mut S,
) -> Result<student::Model>
where
    S: NumberSource,
{
    let class_name = required(&new.class_name, "Class")?;
    let template = student::ActiveModel {
        name: Set(required(&new.name, "Name")?),
        date_of_birth: Set(new.date_of_birth),
        gender: Set(required(&new.gender, "Gender")?),
        address: Set(optional(new.address)),
        phone: Set(optional(new.phone)),
        email: Set(optional(new.email)),
        class_name: Set(class_name.clone()),
        term: Set(new.term.as_str().to_string()),
        academic_year: Set(new.academic_year.to_string()),
        admission_date: Set(new.admission_date),
        ..Default::default()
    };

    for attempt in 1..=max_attempts {
        let txn = db.begin().await?;
        let claimed =
            claim_number(&txn, &template, &class_name, short_name, new.academic_year, numbers).await;

        let outcome = match claimed {
            Ok(created) => txn.commit().await.map(|()| created).map_err(Error::from),
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    warn!("Rollback after a failed registration attempt failed: {}", rollback);
                }
                Err(e)
            }
        };

        match outcome {
            Ok(created) => {
                info!(
                    "Registered {} as {} in {}",
                    created.name, created.reg_number, created.class_name
                );
                return Ok(created);
            }
            Err(Error::Database(e)) if is_retryable_conflict(&e) => {
                warn!(
                    "Registration collided with a concurrent one (attempt {}/{}): {}",
                    attempt, max_attempts, e
                );
            }
            Err(e) => return Err(e),
        }
    }

    Err(Error::AllocationExhausted {
        academic_year: new.academic_year.to_string(),
        attempts: max_attempts,
    })
}

async fn claim_number<S>(
    txn: &DatabaseTransaction,
    template: &student::ActiveModel,
    class_name: &str,
    short_name: &str,
    academic_year: AcademicYear,
    numbers: &mut S,
) -> Result<student::Model>
where
    S: NumberSource,
{
    if !class_exists(txn, class_name).await? {
        return Err(Error::validation(format!("Unknown class '{class_name}'")));
    }

    let reg_number = numbers.propose(txn, short_name, academic_year).await?;
    let mut model = template.clone();
    model.reg_number = Set(reg_number);
    model.insert(txn).await.map_err(Into::into)
}

/// Finds a student by registration number.
///
/// # Errors
/// `NotFound` if the number is unknown.
pub async fn get_student<C>(db: &C, reg_number: &str) -> Result<student::Model>
where
    C: ConnectionTrait,
{
    Student::find_by_id(reg_number.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Student",
            key: reg_number.to_string(),
        })
}

/// Replaces a student's editable details.
///
/// # Errors
/// `NotFound` for an unknown number, `Validation` for empty required fields
/// or an unknown class.
#[instrument(skip(db, update))]
pub async fn update_student(
    db: &DatabaseConnection,
    reg_number: &str,
    update: StudentUpdate,
) -> Result<student::Model> {
    let name = required(&update.name, "Name")?;
    let gender = required(&update.gender, "Gender")?;
    let class_name = required(&update.class_name, "Class")?;

    let txn = db.begin().await?;
    let existing = get_student(&txn, reg_number).await?;
    if !class_exists(&txn, &class_name).await? {
        return Err(Error::validation(format!("Unknown class '{class_name}'")));
    }

    let mut active: student::ActiveModel = existing.into();
    active.name = Set(name);
    active.date_of_birth = Set(update.date_of_birth);
    active.gender = Set(gender);
    active.address = Set(optional(update.address));
    active.phone = Set(optional(update.phone));
    active.email = Set(optional(update.email));
    active.class_name = Set(class_name);
    active.term = Set(update.term.as_str().to_string());
    active.academic_year = Set(update.academic_year.to_string());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!("Updated student {}", updated.reg_number);
    Ok(updated)
}

/// All students currently in a class, by registration number.
pub async fn students_in_class<C>(db: &C, class_name: &str) -> Result<Vec<student::Model>>
where
    C: ConnectionTrait,
{
    Student::find()
        .filter(student::Column::ClassName.eq(class_name))
        .order_by_asc(student::Column::RegNumber)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Students matching every given filter, by registration number.
pub async fn find_students(
    db: &DatabaseConnection,
    filter: &StudentFilter,
) -> Result<Vec<student::Model>> {
    let mut query = Student::find();
    if let Some(class_name) = &filter.class_name {
        query = query.filter(student::Column::ClassName.eq(class_name.as_str()));
    }
    if let Some(term) = filter.term {
        query = query.filter(student::Column::Term.eq(term.as_str()));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(student::Column::Name.contains(search))
                .add(student::Column::RegNumber.contains(search)),
        );
    }
    query
        .order_by_asc(student::Column::RegNumber)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Students whose name or registration number contains `query`, by name.
///
/// An empty query returns nothing.
pub async fn search_students(db: &DatabaseConnection, query: &str) -> Result<Vec<student::Model>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    Student::find()
        .filter(
            Condition::any()
                .add(student::Column::Name.contains(query))
                .add(student::Column::RegNumber.contains(query)),
        )
        .order_by_asc(student::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The most recently admitted students.
pub async fn recent_admissions(db: &DatabaseConnection, limit: u64) -> Result<Vec<student::Model>> {
    Student::find()
        .order_by_desc(student::Column::AdmissionDate)
        .order_by_desc(student::Column::RegNumber)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Number of enrolled students.
pub async fn count_students(db: &DatabaseConnection) -> Result<u64> {
    Student::find().count(db).await.map_err(Into::into)
}
