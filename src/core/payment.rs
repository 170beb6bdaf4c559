//! Payment business logic - recording payments and aggregating them per period.
//!
//! Payments are append-only: there is no edit or delete path. Every total is
//! computed with a fresh `SUM` query, so a payment is reflected in the very
//! next status or breakdown read.

use crate::{
    core::{
        money::{from_minor_units, to_minor_units},
        period::{AcademicYear, Term},
        user,
    },
    entities::{Payment, Student, payment, student},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info, instrument};

/// Input for a new payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Student the payment is for
    pub student_reg_number: String,
    /// Amount in naira; must be positive
    pub amount: Decimal,
    /// Term the payment is credited to
    pub term: Term,
    /// Academic year the payment is credited to
    pub academic_year: AcademicYear,
    /// Date the money was received
    pub payment_date: NaiveDate,
    /// User recording the payment
    pub recorded_by: i64,
}

/// Everything a payment receipt shows.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    /// The payment
    pub payment: payment::Model,
    /// Student the payment was made for
    pub student: student::Model,
    /// Username of the staff member who recorded the payment
    pub recorded_by: String,
}

/// Records a payment for an existing student.
///
/// The student and recorder lookups and the insert run in one transaction.
///
/// # Errors
/// * `Validation` if the amount is zero, negative or has more than two decimals
/// * `NotFound` if the student or recording user does not exist
/// * `Database` if the store fails; nothing is written in that case
#[instrument(skip(db, new), fields(reg_number = %new.student_reg_number))]
pub async fn record_payment(db: &DatabaseConnection, new: NewPayment) -> Result<payment::Model> {
    if new.amount <= Decimal::ZERO {
        return Err(Error::validation("Payment amount must be positive"));
    }
    let amount_kobo = to_minor_units(new.amount)?;

    let txn = db.begin().await?;

    Student::find_by_id(new.student_reg_number.clone())
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Student",
            key: new.student_reg_number.clone(),
        })?;
    user::get_user(&txn, new.recorded_by).await?;

    let created = payment::ActiveModel {
        student_reg_number: Set(new.student_reg_number),
        amount_kobo: Set(amount_kobo),
        term: Set(new.term.as_str().to_string()),
        academic_year: Set(new.academic_year.to_string()),
        payment_date: Set(new.payment_date),
        recorded_by: Set(new.recorded_by),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        "Recorded payment {} of {} for {} ({} {})",
        created.id,
        created.amount(),
        created.student_reg_number,
        created.term,
        created.academic_year
    );
    Ok(created)
}

/// Sum of a student's payments for one period; zero when there are none.
pub async fn total_paid<C>(
    db: &C,
    reg_number: &str,
    term: &str,
    academic_year: &str,
) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let total_kobo: Option<i64> = Payment::find()
        .select_only()
        .column_as(Expr::col(payment::Column::AmountKobo).sum(), "total_kobo")
        .filter(payment::Column::StudentRegNumber.eq(reg_number))
        .filter(payment::Column::Term.eq(term))
        .filter(payment::Column::AcademicYear.eq(academic_year))
        .into_tuple::<Option<i64>>()
        .one(db)
        .await?
        .flatten();

    let total = from_minor_units(total_kobo.unwrap_or(0));
    debug!(
        "Total paid by {} for {} {}: {}",
        reg_number, term, academic_year, total
    );
    Ok(total)
}

/// Sum of every payment ever recorded.
pub async fn total_collected(db: &DatabaseConnection) -> Result<Decimal> {
    let total_kobo: Option<i64> = Payment::find()
        .select_only()
        .column_as(Expr::col(payment::Column::AmountKobo).sum(), "total_kobo")
        .into_tuple::<Option<i64>>()
        .one(db)
        .await?
        .flatten();
    Ok(from_minor_units(total_kobo.unwrap_or(0)))
}

/// Finds a payment by ID.
///
/// # Errors
/// `NotFound` if no such payment exists.
pub async fn get_payment(db: &DatabaseConnection, payment_id: i64) -> Result<payment::Model> {
    Payment::find_by_id(payment_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Payment",
            key: payment_id.to_string(),
        })
}

/// All payments made by a student, most recent first.
pub async fn payments_for_student<C>(db: &C, reg_number: &str) -> Result<Vec<payment::Model>>
where
    C: ConnectionTrait,
{
    Payment::find()
        .filter(payment::Column::StudentRegNumber.eq(reg_number))
        .order_by_desc(payment::Column::PaymentDate)
        .order_by_desc(payment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Gathers the payment, its student and the recorder for a receipt.
///
/// # Errors
/// `NotFound` if the payment, student or recorder is missing.
pub async fn payment_receipt(db: &DatabaseConnection, payment_id: i64) -> Result<PaymentReceipt> {
    let payment = get_payment(db, payment_id).await?;
    let student = Student::find_by_id(payment.student_reg_number.clone())
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Student",
            key: payment.student_reg_number.clone(),
        })?;
    let recorder = user::get_user(db, payment.recorded_by).await?;

    Ok(PaymentReceipt {
        payment,
        student,
        recorded_by: recorder.username,
    })
}
