//! Teacher entity - Teaching staff and the class each one takes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Teacher database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    /// Unique identifier for the teacher
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name
    pub name: String,
    /// Class the teacher is responsible for, if any
    pub class_taught: Option<String>,
    /// Contact email, unique per teacher
    #[sea_orm(unique)]
    pub email: String,
    /// Contact phone number
    pub phone: Option<String>,
}

/// `Teacher` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
