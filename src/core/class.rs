//! Class registry business logic.
//!
//! Students can only be registered into a class that exists here. Classes are
//! seeded from config.toml and can be added later by an administrator.

use crate::{
    entities::{SchoolClass, school_class},
    errors::{Error, Result, conflict_or_storage},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Adds a new class.
///
/// # Errors
/// `Validation` for an empty name, `UniquenessConflict` if the class exists.
#[instrument(skip(db))]
pub async fn add_class<C>(db: &C, name: &str) -> Result<school_class::Model>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Class name cannot be empty"));
    }

    let created = school_class::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| conflict_or_storage(e, "Class", name))?;
    info!("Added class '{}'", created.name);
    Ok(created)
}

/// Lists all classes sorted by name.
pub async fn list_classes(db: &DatabaseConnection) -> Result<Vec<school_class::Model>> {
    SchoolClass::find()
        .order_by_asc(school_class::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Whether a class with exactly this name exists.
pub async fn class_exists<C>(db: &C, name: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    Ok(SchoolClass::find()
        .filter(school_class::Column::Name.eq(name))
        .one(db)
        .await?
        .is_some())
}

/// Adds every class in `names` that is not present yet.
///
/// Returns how many were added.
#[instrument(skip(db, names))]
pub async fn seed_classes(db: &DatabaseConnection, names: &[String]) -> Result<usize> {
    let mut added = 0;
    for name in names {
        if class_exists(db, name.trim()).await? {
            debug!("Class '{}' already present", name);
            continue;
        }
        add_class(db, name).await?;
        added += 1;
    }
    Ok(added)
}
