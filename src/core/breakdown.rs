//! Fee breakdown assembly and student statements.
//!
//! A breakdown lists every academic period a student has touched: the period
//! they registered in, every period they have paid towards, and the period
//! the given date falls in. Each line is computed fresh from the fee
//! schedule and the student's payments.

use crate::{
    core::{
        fees,
        payment::{payments_for_student, total_paid},
        period::{AcademicPeriod, current_period},
        status::{FeeAssessment, UnscheduledFeePolicy, assess_student},
        student::get_student,
    },
    entities::{payment, student},
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Expected, paid and outstanding amounts for one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownLine {
    /// Period this line covers
    pub period: AcademicPeriod,
    /// Scheduled amount, zero when nothing is scheduled
    pub expected: Decimal,
    /// Sum of payments recorded for the period
    pub paid: Decimal,
    /// `expected - paid`; negative when overpaid
    pub outstanding: Decimal,
}

/// A student's full record as shown on the details page.
#[derive(Debug, Clone)]
pub struct StudentStatement {
    /// The student
    pub student: student::Model,
    /// Newest first
    pub payments: Vec<payment::Model>,
    /// Status for the period `today` falls in
    pub current: FeeAssessment,
    /// One line per period, newest first
    pub breakdown: Vec<BreakdownLine>,
}

/// Builds the per-period breakdown for a student, newest period first.
///
/// Periods whose year cannot be parsed or whose term is unknown sort as the
/// oldest (see [`AcademicPeriod::sort_key`]).
#[instrument(skip(db, student), fields(reg_number = %student.reg_number))]
pub async fn build_breakdown<C>(
    db: &C,
    student: &student::Model,
    today: NaiveDate,
) -> Result<Vec<BreakdownLine>>
where
    C: ConnectionTrait,
{
    let mut periods = BTreeSet::new();
    periods.insert(AcademicPeriod {
        academic_year: student.academic_year.clone(),
        term: student.term.clone(),
    });
    for payment in payments_for_student(db, &student.reg_number).await? {
        periods.insert(AcademicPeriod {
            academic_year: payment.academic_year,
            term: payment.term,
        });
    }
    let (year, term) = current_period(today);
    periods.insert(AcademicPeriod::new(year, term));

    let mut lines = Vec::with_capacity(periods.len());
    for period in periods {
        let expected =
            fees::scheduled_amount(db, &student.class_name, &period.term, &period.academic_year)
                .await?
                .unwrap_or(Decimal::ZERO);
        let paid = total_paid(db, &student.reg_number, &period.term, &period.academic_year).await?;
        lines.push(BreakdownLine {
            period,
            expected,
            paid,
            outstanding: expected - paid,
        });
    }

    // Stable: periods sharing a key keep their string order.
    lines.sort_by(|a, b| b.period.sort_key().cmp(&a.period.sort_key()));

    debug!("Breakdown covers {} periods", lines.len());
    Ok(lines)
}

/// Loads a student with payments, current status and breakdown.
///
/// # Errors
/// `NotFound` if the registration number is unknown.
pub async fn student_statement(
    db: &DatabaseConnection,
    reg_number: &str,
    today: NaiveDate,
    policy: UnscheduledFeePolicy,
) -> Result<StudentStatement> {
    let student = get_student(db, reg_number).await?;
    let payments = payments_for_student(db, reg_number).await?;
    let (year, term) = current_period(today);
    let current = assess_student(db, &student, year, term, policy).await?;
    let breakdown = build_breakdown(db, &student, today).await?;

    Ok(StudentStatement {
        student,
        payments,
        current,
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::core::{
        fees::set_fee,
        period::{AcademicYear, Term},
        status::FeeStatus,
    };
    use crate::test_utils::*;

    fn periods(lines: &[BreakdownLine]) -> Vec<String> {
        lines.iter().map(|l| l.period.to_string()).collect()
    }

    #[tokio::test]
    async fn test_breakdown_merges_payments_per_period() -> Result<()> {
        let (db, recorder, student) = setup_with_student("JSS 1").await?;
        set_fee(&db, "JSS 1", Term::FirstTerm, year_2024(), Decimal::from(25000)).await?;
        record_test_payment(&db, &student.reg_number, recorder.id, Decimal::from(10000)).await?;
        record_test_payment(&db, &student.reg_number, recorder.id, Decimal::from(10000)).await?;

        // Today is inside the registration period.
        let today = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        let lines = build_breakdown(&db, &student, today).await?;

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].period.to_string(), "First Term 2024/2025");
        assert_eq!(lines[0].expected, Decimal::from(25000));
        assert_eq!(lines[0].paid, Decimal::from(20000));
        assert_eq!(lines[0].outstanding, Decimal::from(5000));
        Ok(())
    }

    #[tokio::test]
    async fn test_breakdown_orders_newest_first() -> Result<()> {
        let (db, recorder, student) = setup_with_student("JSS 1").await?;
        record_payment_for(
            &db,
            &student.reg_number,
            recorder.id,
            Decimal::from(3000),
            Term::ThirdTerm,
            AcademicYear::starting(2024),
        )
        .await?;

        let today = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
        let lines = build_breakdown(&db, &student, today).await?;

        assert_eq!(
            periods(&lines),
            vec![
                "Third Term 2024/2025",
                "Second Term 2024/2025",
                "First Term 2024/2025",
            ]
        );
        // Nothing scheduled for the third term, so the payment is credit.
        assert_eq!(lines[0].expected, Decimal::ZERO);
        assert_eq!(lines[0].outstanding, Decimal::from(-3000));
        Ok(())
    }

    #[tokio::test]
    async fn test_overpayment_is_not_clamped() -> Result<()> {
        let (db, recorder, student) = setup_with_student("JSS 1").await?;
        set_fee(&db, "JSS 1", Term::FirstTerm, year_2024(), Decimal::from(25000)).await?;
        record_test_payment(&db, &student.reg_number, recorder.id, Decimal::from(30000)).await?;

        let today = NaiveDate::from_ymd_opt(2024, 11, 5).unwrap();
        let lines = build_breakdown(&db, &student, today).await?;
        assert_eq!(lines[0].outstanding, Decimal::from(-5000));
        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_year_sorts_oldest() -> Result<()> {
        let (db, _recorder, mut student) = setup_with_student("JSS 1").await?;
        student.academic_year = "unknown".to_string();

        let today = NaiveDate::from_ymd_opt(2024, 9, 20).unwrap();
        let lines = build_breakdown(&db, &student, today).await?;

        assert_eq!(
            periods(&lines),
            vec!["First Term 2024/2025", "First Term unknown"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_student_statement() -> Result<()> {
        let (db, recorder, student) = setup_with_student("JSS 1").await?;
        set_fee(&db, "JSS 1", Term::FirstTerm, year_2024(), Decimal::from(25000)).await?;
        record_test_payment(&db, &student.reg_number, recorder.id, Decimal::from(25000)).await?;

        let today = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let statement =
            student_statement(&db, &student.reg_number, today, UnscheduledFeePolicy::Paid).await?;

        assert_eq!(statement.student.reg_number, student.reg_number);
        assert_eq!(statement.payments.len(), 1);
        assert_eq!(statement.current.status, FeeStatus::Paid);
        assert_eq!(statement.breakdown.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_student_statement_unknown_student() -> Result<()> {
        let db = setup_test_db().await?;
        let today = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let result =
            student_statement(&db, "AAM/24/0404", today, UnscheduledFeePolicy::Paid).await;
        assert!(matches!(result, Err(crate::errors::Error::NotFound { .. })));
        Ok(())
    }
}
