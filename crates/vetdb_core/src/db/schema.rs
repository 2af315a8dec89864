//! Clinic schema initializer.
//!
//! The whole schema is one idempotent script (`schema.sql`). A file is
//! stamped with `PRAGMA user_version = SCHEMA_VERSION` once the tables are in
//! place; files written by older tools carry version 0 and are stamped on
//! first open without touching their rows.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;
use std::cmp::Ordering;

const SCHEMA_VERSION: u32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Schema version written by this binary.
pub fn schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Creates any missing clinic tables and stamps the schema version.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found = stored_schema_version(conn)?;
    match found.cmp(&SCHEMA_VERSION) {
        Ordering::Greater => Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: SCHEMA_VERSION,
        }),
        Ordering::Equal => Ok(()),
        Ordering::Less => {
            let tx = conn.transaction()?;
            tx.execute_batch(SCHEMA_SQL)?;
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tx.commit()?;
            Ok(())
        }
    }
}

/// Reads `PRAGMA user_version`.
pub fn stored_schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
