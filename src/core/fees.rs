//! Fee schedule business logic.
//!
//! The schedule maps (class, term, academic year) to the amount a student in
//! that class is expected to pay for that period. It is independent of any
//! student and of payments. A missing entry means "no fee configured"; how
//! that counts towards a student's status is decided by
//! [`crate::core::status::UnscheduledFeePolicy`].

use crate::{
    config::school::FeeEntryConfig,
    core::{
        money::{from_minor_units, to_minor_units},
        period::{AcademicYear, Term},
    },
    entities::{FeeSchedule, fee_schedule},
    errors::{Error, Result, conflict_or_storage},
};
use rust_decimal::Decimal;
use sea_orm::{Set, prelude::*};
use tracing::{debug, info, instrument};

/// Looks up the schedule entry for a class in a period.
pub async fn get_fee<C>(
    db: &C,
    class_name: &str,
    term: &str,
    academic_year: &str,
) -> Result<Option<fee_schedule::Model>>
where
    C: ConnectionTrait,
{
    FeeSchedule::find()
        .filter(fee_schedule::Column::ClassName.eq(class_name))
        .filter(fee_schedule::Column::Term.eq(term))
        .filter(fee_schedule::Column::AcademicYear.eq(academic_year))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Expected amount for a class in a period, or `None` when nothing is scheduled.
pub async fn scheduled_amount<C>(
    db: &C,
    class_name: &str,
    term: &str,
    academic_year: &str,
) -> Result<Option<Decimal>>
where
    C: ConnectionTrait,
{
    let entry = get_fee(db, class_name, term, academic_year).await?;
    debug!(
        "Scheduled fee for {} {} {}: {:?}",
        class_name,
        term,
        academic_year,
        entry.as_ref().map(fee_schedule::Model::amount)
    );
    Ok(entry.map(|e| from_minor_units(e.amount_kobo)))
}

/// Adds a schedule entry.
///
/// # Errors
/// `Validation` for a negative amount or empty class, `UniquenessConflict` if
/// the (class, term, year) key already has an entry.
#[instrument(skip(db))]
pub async fn set_fee<C>(
    db: &C,
    class_name: &str,
    term: Term,
    academic_year: AcademicYear,
    amount: Decimal,
) -> Result<fee_schedule::Model>
where
    C: ConnectionTrait,
{
    let class_name = class_name.trim();
    if class_name.is_empty() {
        return Err(Error::validation("Class name cannot be empty"));
    }
    if amount.is_sign_negative() {
        return Err(Error::validation("Fee amount cannot be negative"));
    }
    let amount_kobo = to_minor_units(amount)?;
    let key = format!("{class_name} {term} {academic_year}");

    let created = fee_schedule::ActiveModel {
        class_name: Set(class_name.to_string()),
        term: Set(term.as_str().to_string()),
        academic_year: Set(academic_year.to_string()),
        amount_kobo: Set(amount_kobo),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| conflict_or_storage(e, "Fee", key))?;
    info!(
        "Scheduled fee {} for {} {} {}",
        created.amount(),
        created.class_name,
        created.term,
        created.academic_year
    );
    Ok(created)
}

/// Changes the amount of an existing schedule entry.
///
/// # Errors
/// `NotFound` if there is no entry for the key.
#[instrument(skip(db))]
pub async fn update_fee(
    db: &DatabaseConnection,
    class_name: &str,
    term: Term,
    academic_year: AcademicYear,
    amount: Decimal,
) -> Result<fee_schedule::Model> {
    if amount.is_sign_negative() {
        return Err(Error::validation("Fee amount cannot be negative"));
    }
    let amount_kobo = to_minor_units(amount)?;
    let year = academic_year.to_string();

    let existing = get_fee(db, class_name.trim(), term.as_str(), &year)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Fee",
            key: format!("{} {term} {year}", class_name.trim()),
        })?;

    let mut active: fee_schedule::ActiveModel = existing.into();
    active.amount_kobo = Set(amount_kobo);
    let updated = active.update(db).await?;
    info!(
        "Updated fee for {} {} {} to {}",
        updated.class_name,
        updated.term,
        updated.academic_year,
        updated.amount()
    );
    Ok(updated)
}

/// Lists the schedule, newest year first, then class and term.
pub async fn list_fees(db: &DatabaseConnection) -> Result<Vec<fee_schedule::Model>> {
    let mut fees = FeeSchedule::find().all(db).await?;
    // Term names do not sort alphabetically in calendar order.
    fees.sort_by(|a, b| {
        b.academic_year
            .cmp(&a.academic_year)
            .then_with(|| a.class_name.cmp(&b.class_name))
            .then_with(|| term_rank(&a.term).cmp(&term_rank(&b.term)))
    });
    Ok(fees)
}

fn term_rank(term: &str) -> i32 {
    term.parse::<Term>().map_or(-1, Term::index)
}

/// Inserts each configured entry whose key has no entry yet.
///
/// Existing entries are left untouched so that amounts edited after the first
/// start are not overwritten. Returns how many entries were added.
#[instrument(skip(db, entries))]
pub async fn seed_fee_schedule(db: &DatabaseConnection, entries: &[FeeEntryConfig]) -> Result<usize> {
    let mut added = 0;
    for entry in entries {
        let term: Term = entry.term.parse()?;
        let year = AcademicYear::parse(&entry.academic_year)?;
        if get_fee(db, entry.class.trim(), term.as_str(), &year.to_string())
            .await?
            .is_some()
        {
            continue;
        }
        set_fee(db, &entry.class, term, year, entry.amount).await?;
        added += 1;
    }
    info!("Seeded {} fee schedule entries", added);
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_set_and_lookup_fee() -> Result<()> {
        let db = setup_test_db().await?;
        set_fee(&db, "JSS 1", Term::FirstTerm, year_2024(), Decimal::from(25000)).await?;

        let amount = scheduled_amount(&db, "JSS 1", "First Term", "2024/2025").await?;
        assert_eq!(amount, Some(Decimal::from(25000)));

        let missing = scheduled_amount(&db, "JSS 1", "Second Term", "2024/2025").await?;
        assert_eq!(missing, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_fee_key_conflicts() -> Result<()> {
        let db = setup_test_db().await?;
        set_fee(&db, "JSS 1", Term::FirstTerm, year_2024(), Decimal::from(25000)).await?;
        let result = set_fee(&db, "JSS 1", Term::FirstTerm, year_2024(), Decimal::from(1)).await;
        assert!(matches!(result, Err(Error::UniquenessConflict { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_negative_fee_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let result = set_fee(&db, "JSS 1", Term::FirstTerm, year_2024(), Decimal::from(-1)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_fee() -> Result<()> {
        let db = setup_test_db().await?;
        set_fee(&db, "SS 1", Term::ThirdTerm, year_2024(), Decimal::from(30000)).await?;
        let updated = update_fee(&db, "SS 1", Term::ThirdTerm, year_2024(), Decimal::from(32000)).await?;
        assert_eq!(updated.amount(), Decimal::from(32000));

        let missing = update_fee(&db, "SS 2", Term::ThirdTerm, year_2024(), Decimal::from(1)).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_fees_orders_terms_by_calendar() -> Result<()> {
        let db = setup_test_db().await?;
        set_fee(&db, "JSS 1", Term::ThirdTerm, year_2024(), Decimal::from(20000)).await?;
        set_fee(&db, "JSS 1", Term::FirstTerm, year_2024(), Decimal::from(25000)).await?;
        set_fee(&db, "JSS 1", Term::SecondTerm, year_2024(), Decimal::from(20000)).await?;

        let terms: Vec<String> = list_fees(&db).await?.into_iter().map(|f| f.term).collect();
        assert_eq!(terms, vec!["First Term", "Second Term", "Third Term"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_fee_schedule_keeps_existing_amounts() -> Result<()> {
        let db = setup_test_db().await?;
        set_fee(&db, "JSS 1", Term::FirstTerm, year_2024(), Decimal::from(26000)).await?;

        let entries = vec![
            FeeEntryConfig {
                class: "JSS 1".to_string(),
                term: "First Term".to_string(),
                academic_year: "2024/2025".to_string(),
                amount: Decimal::from(25000),
            },
            FeeEntryConfig {
                class: "JSS 1".to_string(),
                term: "Second Term".to_string(),
                academic_year: "2024/2025".to_string(),
                amount: Decimal::from(20000),
            },
        ];
        assert_eq!(seed_fee_schedule(&db, &entries).await?, 1);

        let first = scheduled_amount(&db, "JSS 1", "First Term", "2024/2025").await?;
        assert_eq!(first, Some(Decimal::from(26000)));
        Ok(())
    }
}
