//! Fee schedule entity - Expected fee for one class in one academic period.
//!
//! `(class_name, term, academic_year)` is unique; the composite index is
//! created alongside the table in `config::database::create_tables`.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fee schedule database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_schedule")]
pub struct Model {
    /// Surrogate key
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Class the fee applies to
    pub class_name: String,
    /// Term the fee applies to
    pub term: String,
    /// Academic year the fee applies to
    pub academic_year: String,
    /// Expected amount in kobo
    pub amount_kobo: i64,
}

impl Model {
    /// Expected amount as a two-decimal value.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        crate::core::money::from_minor_units(self.amount_kobo)
    }
}

/// Fee entries refer to classes by name only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
