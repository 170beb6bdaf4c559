//! Payment entity - A single fee payment made by a student.
//!
//! Payments are immutable once recorded. The amount is stored in kobo
//! (`amount_kobo`, hundredths of a naira) so that sums stay exact; use
//! [`Model::amount`] for the decimal value.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Registration number of the paying student
    pub student_reg_number: String,
    /// Amount paid in kobo
    pub amount_kobo: i64,
    /// Term the payment is credited to
    pub term: String,
    /// Academic year the payment is credited to
    pub academic_year: String,
    /// Date the money was received
    pub payment_date: Date,
    /// ID of the user who recorded the payment
    pub recorded_by: i64,
}

impl Model {
    /// Amount paid as a two-decimal value.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        crate::core::money::from_minor_units(self.amount_kobo)
    }
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one student
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentRegNumber",
        to = "super::student::Column::RegNumber"
    )]
    Student,
    /// Each payment was recorded by one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RecordedBy",
        to = "super::user::Column::Id"
    )]
    Recorder,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recorder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
