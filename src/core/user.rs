//! Staff user business logic - creating users and resolving the acting user.

use crate::{
    core::access::{Actor, Role},
    entities::{User, user},
    errors::{Error, Result, conflict_or_storage},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

const BOOTSTRAP_ADMIN: &str = "admin";

/// Creates a user with the given role.
///
/// # Errors
/// `Validation` for an empty username, `UniquenessConflict` if the username
/// is taken.
#[instrument(skip(db))]
pub async fn create_user<C>(db: &C, username: &str, role: Role) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::validation("Username cannot be empty"));
    }

    let model = user::ActiveModel {
        username: Set(username.to_string()),
        role: Set(role.as_str().to_string()),
        ..Default::default()
    };
    let created = model
        .insert(db)
        .await
        .map_err(|e| conflict_or_storage(e, "User", username))?;
    info!("Created {} user '{}'", role, created.username);
    Ok(created)
}

/// Finds a user by login name.
pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Username.eq(username.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a user by ID.
pub async fn get_user<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "User",
            key: user_id.to_string(),
        })
}

/// Resolves the acting user for capability checks.
///
/// # Errors
/// `NotFound` if no such user exists.
pub async fn resolve_actor(db: &DatabaseConnection, username: &str) -> Result<Actor> {
    let user = get_user_by_username(db, username)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "User",
            key: username.to_string(),
        })?;
    Actor::from_user(&user)
}

/// Counts users holding `role`.
pub async fn count_users_with_role(db: &DatabaseConnection, role: Role) -> Result<u64> {
    User::find()
        .filter(user::Column::Role.eq(role.as_str()))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Lists all users ordered by username.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Username)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates the first `admin` account when the school has no administrator.
///
/// Returns the new user, or `None` if an administrator already exists.
#[instrument(skip(db))]
pub async fn bootstrap_admin(db: &DatabaseConnection) -> Result<Option<user::Model>> {
    if count_users_with_role(db, Role::Admin).await? > 0 {
        info!("Administrator already present, bootstrap skipped");
        return Ok(None);
    }
    create_user(db, BOOTSTRAP_ADMIN, Role::Admin).await.map(Some)
}
