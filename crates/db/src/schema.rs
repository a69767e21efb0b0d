//! Database schema initialization for Slate
//!
//! Defines the SurrealDB tables for tracks, schedule entries and the
//! single settings record.

use crate::error::DbError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// SQL statements for schema initialization
mod sql {
    pub const DEFINE_TRACK_TABLE: &str = r#"
        DEFINE TABLE IF NOT EXISTS track SCHEMAFULL;

        DEFINE FIELD IF NOT EXISTS name ON track TYPE string;

        DEFINE FIELD IF NOT EXISTS color ON track TYPE string DEFAULT "";

        DEFINE FIELD IF NOT EXISTS display_order ON track TYPE int
            ASSERT $value >= 0;

        DEFINE FIELD IF NOT EXISTS scope ON track TYPE string
            ASSERT $value IN ["lane", "shared"];

        DEFINE FIELD IF NOT EXISTS created_at ON track TYPE datetime DEFAULT time::now();
    "#;

    /// Entries keep their creation sequence; it breaks start-time ties.
    pub const DEFINE_ENTRY_TABLE: &str = r#"
        DEFINE TABLE IF NOT EXISTS entry SCHEMAFULL;

        DEFINE FIELD IF NOT EXISTS track_id ON entry TYPE string;

        DEFINE FIELD IF NOT EXISTS title ON entry TYPE string DEFAULT "";

        DEFINE FIELD IF NOT EXISTS kind ON entry TYPE string
            ASSERT $value IN ["shot", "custom"];

        DEFINE FIELD IF NOT EXISTS start_time ON entry TYPE int
            ASSERT $value >= 0 AND $value < 1440;

        DEFINE FIELD IF NOT EXISTS duration ON entry TYPE int
            ASSERT $value > 0;

        DEFINE FIELD IF NOT EXISTS applies_to ON entry TYPE option<array<string>>;

        DEFINE FIELD IF NOT EXISTS seq ON entry TYPE int;

        DEFINE FIELD IF NOT EXISTS created_at ON entry TYPE datetime DEFAULT time::now();

        DEFINE FIELD IF NOT EXISTS deleted_at ON entry TYPE option<datetime>;

        DEFINE INDEX IF NOT EXISTS entry_seq ON entry FIELDS seq;
    "#;

    pub const DEFINE_SETTINGS_TABLE: &str = r#"
        DEFINE TABLE IF NOT EXISTS settings SCHEMAFULL;

        DEFINE FIELD IF NOT EXISTS day_start_time ON settings TYPE int
            ASSERT $value >= 0 AND $value < 1440;

        DEFINE FIELD IF NOT EXISTS cascade_changes ON settings TYPE bool DEFAULT true;

        DEFINE FIELD IF NOT EXISTS time_increment ON settings TYPE int
            ASSERT $value IN [5, 15, 30];
    "#;
}

/// Initialize the database schema.
///
/// Idempotent; every definition uses `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns `DbError::Schema` if any schema definition fails.
pub async fn init_schema(client: &Surreal<Db>) -> Result<(), DbError> {
    for statement in [
        sql::DEFINE_TRACK_TABLE,
        sql::DEFINE_ENTRY_TABLE,
        sql::DEFINE_SETTINGS_TABLE,
    ] {
        client
            .query(statement)
            .await
            .map_err(|e| DbError::Schema(Box::new(e)))?
            .check()
            .map_err(|e| DbError::Schema(Box::new(e)))?;
    }

    Ok(())
}
