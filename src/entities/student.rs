//! Student entity - One enrolled student, keyed by registration number.
//!
//! The registration number is assigned once at enrollment and never changes
//! or gets reused. `class_name`, `term` and `academic_year` describe where the
//! student currently sits; `term`/`academic_year` at registration also mark
//! the first period the student owes fees for.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Student database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Registration number in `{SHORT_NAME}/{YY}/{NNNN}` form
    #[sea_orm(primary_key, auto_increment = false)]
    pub reg_number: String,
    /// Full name
    pub name: String,
    /// Date of birth
    pub date_of_birth: Date,
    /// Gender as entered at registration
    pub gender: String,
    /// Home address
    pub address: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Current class (e.g. "JSS 1")
    pub class_name: String,
    /// Current term (e.g. "First Term")
    pub term: String,
    /// Current academic year (e.g. "2024/2025")
    pub academic_year: String,
    /// Date the student was admitted
    pub admission_date: Date,
}

/// Defines relationships between Student and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One student has many payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
