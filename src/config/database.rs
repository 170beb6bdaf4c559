//! Database configuration module for the school ledger.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. Uniqueness the entities cannot express on a single column (the
//! fee schedule key) is added as a separate unique index.

use crate::entities::{
    FeeSchedule, Payment, SchoolClass, Student, Teacher, User, fee_schedule,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, TableCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/school_ledger.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if the variable is not set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {}", database_url);
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Directory holding a file-backed `SQLite` database, if the URL names one.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

fn table_for<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    table
}

/// Creates all tables and indexes if they do not exist yet.
///
/// Order matters: payments reference both students and users.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    db.execute(builder.build(&table_for(&schema, User))).await?;
    db.execute(builder.build(&table_for(&schema, SchoolClass))).await?;
    db.execute(builder.build(&table_for(&schema, Teacher))).await?;
    db.execute(builder.build(&table_for(&schema, Student))).await?;
    db.execute(builder.build(&table_for(&schema, FeeSchedule))).await?;
    db.execute(builder.build(&table_for(&schema, Payment))).await?;

    let fee_key_index = Index::create()
        .name("idx_fee_schedule_class_term_year")
        .table(FeeSchedule)
        .col(fee_schedule::Column::ClassName)
        .col(fee_schedule::Column::Term)
        .col(fee_schedule::Column::AcademicYear)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&fee_key_index)).await?;

    info!("Database tables ensured.");
    Ok(())
}
