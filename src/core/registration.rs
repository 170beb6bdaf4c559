//! Registration number allocation.
//!
//! Numbers look like `AAM/25/0001`: the school's short name, the last two
//! digits of the academic year's first calendar year, and a four-digit
//! sequence that restarts at 0001 for every year. The next number is read
//! from the greatest existing number under the year's prefix, compared
//! byte for byte. Two concurrent registrations can read the same value; the
//! primary key on `students.reg_number` rejects the second insert (or the
//! store refuses the second writer) and the caller retries (see
//! `core::student::register_student`).

use crate::{
    core::period::AcademicYear,
    entities::{Student, student},
    errors::{Error, Result},
};
use sea_orm::{DatabaseTransaction, QueryOrder, prelude::*};
use tracing::debug;

const MAX_SEQUENCE: u32 = 9999;

/// Proposes registration numbers inside a registration transaction.
///
/// The proposal is only claimed once the student row is inserted, so a
/// source may return a number that turns out to be taken.
pub trait NumberSource {
    /// Next candidate number for `academic_year`.
    fn propose(
        &mut self,
        txn: &DatabaseTransaction,
        short_name: &str,
        academic_year: AcademicYear,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Greatest stored number under the year's prefix, plus one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NextInSequence;

impl NumberSource for NextInSequence {
    async fn propose(
        &mut self,
        txn: &DatabaseTransaction,
        short_name: &str,
        academic_year: AcademicYear,
    ) -> Result<String> {
        allocate(txn, short_name, academic_year).await
    }
}

/// The `{SHORT_NAME}/{YY}/` prefix shared by every number of a year.
#[must_use]
pub fn registration_prefix(short_name: &str, academic_year: AcademicYear) -> String {
    format!("{}/{}/", short_name.trim(), academic_year.short_code())
}

/// Computes the next free registration number for an academic year.
///
/// This only reads; the number is claimed by inserting the student.
///
/// # Errors
/// * `Validation` if the greatest existing number has a non-numeric suffix
/// * `SequenceOverflow` once 9999 numbers have been issued for the year
/// * `Database` if the store cannot be queried
pub async fn allocate<C>(db: &C, short_name: &str, academic_year: AcademicYear) -> Result<String>
where
    C: ConnectionTrait,
{
    let prefix = registration_prefix(short_name, academic_year);
    // Binary range instead of LIKE: LIKE folds case and treats `_`/`%` in the
    // short name as wildcards.
    let upper = format!("{prefix}{}", char::MAX);

    let last = Student::find()
        .filter(student::Column::RegNumber.gte(prefix.as_str()))
        .filter(student::Column::RegNumber.lt(upper.as_str()))
        .order_by_desc(student::Column::RegNumber)
        .one(db)
        .await?;

    let next = match last {
        Some(last) => {
            let suffix = last.reg_number.get(prefix.len()..).unwrap_or_default();
            let number: u32 = suffix.parse().map_err(|_| {
                Error::validation(format!(
                    "Existing registration number '{}' has a non-numeric sequence",
                    last.reg_number
                ))
            })?;
            number + 1
        }
        None => 1,
    };

    if next > MAX_SEQUENCE {
        return Err(Error::SequenceOverflow { prefix });
    }

    let reg_number = format!("{prefix}{next:04}");
    debug!("Allocated registration number {}", reg_number);
    Ok(reg_number)
}
