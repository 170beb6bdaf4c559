//! Teacher registry business logic.

use crate::{
    entities::{Teacher, teacher},
    errors::{Error, Result, conflict_or_storage},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Input for a new teacher.
#[derive(Debug, Clone)]
pub struct NewTeacher {
    /// Full name
    pub name: String,
    /// Class the teacher is responsible for, if any
    pub class_taught: Option<String>,
    /// Contact email, unique
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
}

/// Adds a teacher.
///
/// # Errors
/// `Validation` if the name or email is empty or the email has no `@`,
/// `UniquenessConflict` if the email is already registered.
#[instrument(skip(db, new), fields(email = %new.email))]
pub async fn add_teacher(db: &DatabaseConnection, new: NewTeacher) -> Result<teacher::Model> {
    let name = new.name.trim().to_string();
    let email = new.email.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("Teacher name cannot be empty"));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(Error::validation(format!("'{email}' is not a valid email")));
    }

    let created = teacher::ActiveModel {
        name: Set(name),
        class_taught: Set(non_empty(new.class_taught)),
        email: Set(email.clone()),
        phone: Set(non_empty(new.phone)),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| conflict_or_storage(e, "Teacher", email))?;
    info!("Added teacher '{}'", created.name);
    Ok(created)
}

/// Lists all teachers by name.
pub async fn list_teachers(db: &DatabaseConnection) -> Result<Vec<teacher::Model>> {
    Teacher::find()
        .order_by_asc(teacher::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Number of teachers on record.
pub async fn count_teachers(db: &DatabaseConnection) -> Result<u64> {
    Teacher::find().count(db).await.map_err(Into::into)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
