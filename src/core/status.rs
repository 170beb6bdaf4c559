//! Fee status engine.
//!
//! A student's status for a period is a pure function of two numbers: the
//! amount scheduled for their class in that period and the sum of their
//! payments for that period. Nothing is cached; every call reads fresh
//! aggregates from the store.

use crate::{
    core::{
        fees,
        payment::total_paid,
        period::{AcademicPeriod, AcademicYear, Term},
    },
    entities::{Student, student},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, EntityTrait};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

/// Whether a student's fees for a period are settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeStatus {
    /// Payments cover the expected amount
    Paid,
    /// Payments fall short of the expected amount
    Defaulter,
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paid => f.write_str("Paid"),
            Self::Defaulter => f.write_str("Defaulter"),
        }
    }
}

/// Status given to a period that has no fee schedule entry for the class.
///
/// An entry with an amount of zero is a waived fee and is always `Paid`;
/// this policy only covers the case where no entry exists at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnscheduledFeePolicy {
    /// Nothing is owed when no fee is configured
    #[default]
    Paid,
    /// A missing fee is treated as an unsettled obligation
    Defaulter,
}

/// Inputs and outcome of one status computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeAssessment {
    /// Student assessed
    pub reg_number: String,
    /// Period assessed
    pub period: AcademicPeriod,
    /// Scheduled amount, `None` when no entry exists
    pub scheduled: Option<Decimal>,
    /// Sum of payments for the period
    pub paid: Decimal,
    /// Outcome
    pub status: FeeStatus,
}

impl FeeAssessment {
    /// Expected amount, zero when nothing is scheduled.
    #[must_use]
    pub fn expected(&self) -> Decimal {
        self.scheduled.unwrap_or(Decimal::ZERO)
    }

    /// Expected minus paid; negative when the student has paid in advance.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        self.expected() - self.paid
    }
}

/// Decides the status from the scheduled amount and the amount paid.
#[must_use]
pub fn decide_status(
    scheduled: Option<Decimal>,
    paid: Decimal,
    policy: UnscheduledFeePolicy,
) -> FeeStatus {
    match scheduled {
        Some(expected) if expected > Decimal::ZERO => {
            if paid >= expected {
                FeeStatus::Paid
            } else {
                FeeStatus::Defaulter
            }
        }
        Some(_) => FeeStatus::Paid,
        None => match policy {
            UnscheduledFeePolicy::Paid => FeeStatus::Paid,
            UnscheduledFeePolicy::Defaulter => FeeStatus::Defaulter,
        },
    }
}

/// Assesses an already-loaded student for a period.
pub async fn assess_student<C>(
    db: &C,
    student: &student::Model,
    academic_year: AcademicYear,
    term: Term,
    policy: UnscheduledFeePolicy,
) -> Result<FeeAssessment>
where
    C: ConnectionTrait,
{
    let period = AcademicPeriod::new(academic_year, term);
    let scheduled =
        fees::scheduled_amount(db, &student.class_name, &period.term, &period.academic_year)
            .await?;
    let paid = total_paid(db, &student.reg_number, &period.term, &period.academic_year).await?;
    let status = decide_status(scheduled, paid, policy);

    debug!(
        "{} for {}: scheduled={:?} paid={} status={}",
        student.reg_number, period, scheduled, paid, status
    );
    Ok(FeeAssessment {
        reg_number: student.reg_number.clone(),
        period,
        scheduled,
        paid,
        status,
    })
}

/// Assesses a student, looked up by registration number, for a period.
///
/// # Errors
/// `NotFound` if the registration number is unknown.
#[instrument(skip(db))]
pub async fn assess<C>(
    db: &C,
    reg_number: &str,
    academic_year: AcademicYear,
    term: Term,
    policy: UnscheduledFeePolicy,
) -> Result<FeeAssessment>
where
    C: ConnectionTrait,
{
    let student = Student::find_by_id(reg_number.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Student",
            key: reg_number.to_string(),
        })?;
    assess_student(db, &student, academic_year, term, policy).await
}

/// Computes the fee status of a student for a period.
///
/// # Errors
/// `NotFound` if the registration number is unknown.
pub async fn compute_status<C>(
    db: &C,
    reg_number: &str,
    academic_year: AcademicYear,
    term: Term,
    policy: UnscheduledFeePolicy,
) -> Result<FeeStatus>
where
    C: ConnectionTrait,
{
    Ok(assess(db, reg_number, academic_year, term, policy)
        .await?
        .status)
}
