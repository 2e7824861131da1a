//! Schema migrations
//!
//! The SQL files live in `crates/campus-db/migrations` and are applied in
//! version order; already applied versions are skipped.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use std::path::Path;
use tracing::info;

const MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/migrations");

/// Apply all pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let migrator = Migrator::new(Path::new(MIGRATIONS_DIR)).await?;
    info!(count = migrator.iter().count(), "Applying database migrations");
    migrator.run(pool).await
}
