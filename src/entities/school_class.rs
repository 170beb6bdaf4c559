//! Class entity - The classes a student can be enrolled in (e.g. "JSS 1", "SS 3").

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Class database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    /// Surrogate key
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the class, unique
    #[sea_orm(unique)]
    pub name: String,
}

/// No relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
