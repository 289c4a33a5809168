//! Database schema migrations
//!
//! Versioned SQL scripts under `migrations/` are embedded at compile time and
//! applied in ascending version order. Applied versions are recorded in the
//! `schema_version` table, so running the migrator repeatedly is a no-op.
//!
//! # Migration Guidelines
//!
//! 1. **Never modify existing migrations** - databases in the field already applied them
//! 2. **Always add new migrations** - one new file and one new [`MIGRATIONS`] entry per change
//! 3. **Keep scripts idempotent** - prefer `IF NOT EXISTS` forms

use crate::{Error, Result};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// One embedded migration script
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations, in application order
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create songs table",
        sql: include_str!("../../migrations/0001_create_songs.sql"),
    },
    Migration {
        version: 2,
        description: "songs lookup indexes",
        sql: include_str!("../../migrations/0002_songs_lookup_indexes.sql"),
    },
    Migration {
        version: 3,
        description: "case-folded search columns",
        sql: include_str!("../../migrations/0003_songs_folded_columns.sql"),
    },
];

/// Version of the newest embedded migration
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Get current schema version from database
///
/// Returns 0 when no migration has been recorded yet
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i64> {
    let version: Option<i64> =
        sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
            .fetch_one(pool)
            .await?;

    Ok(version.unwrap_or(0))
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;

    let current_version = get_schema_version(pool).await?;
    let target_version = latest_version();

    if current_version == target_version {
        info!("Database schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > target_version {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current_version, target_version
        );
        warn!("This may indicate a downgrade. Proceeding with caution.");
        return Ok(());
    }

    info!(
        "Running database migrations: v{} -> v{}",
        current_version, target_version
    );

    for migration in MIGRATIONS.iter().filter(|m| m.version > current_version) {
        apply_migration(pool, migration).await?;
        info!(
            "✓ Migration v{} completed ({})",
            migration.version, migration.description
        );
    }

    info!("All migrations completed successfully");
    Ok(())
}

/// Apply one migration and record it atomically
async fn apply_migration(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    let wrap = |source: sqlx::Error| Error::Migration {
        version: migration.version,
        source,
    };

    let mut tx = pool.begin().await.map_err(wrap)?;

    sqlx::raw_sql(migration.sql)
        .execute(&mut *tx)
        .await
        .map_err(wrap)?;

    sqlx::query("INSERT INTO schema_version (version, description) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.description)
        .execute(&mut *tx)
        .await
        .map_err(wrap)?;

    tx.commit().await.map_err(wrap)?;

    Ok(())
}
