//! Database migration runner.
//!
//! The schema is versioned through `PRAGMA user_version`.  Every open walks
//! the step table and applies whatever the on-disk version is missing, so a
//! database created by an older release upgrades in place.

pub mod v001_initial;

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Ordered migration steps; the step at index `i` upgrades a version-`i`
/// database to version `i + 1`.
const STEPS: &[fn(&Connection) -> rusqlite::Result<()>] = &[v001_initial::up];

/// Schema version a fully migrated database reports.
pub const CURRENT_VERSION: u32 = STEPS.len() as u32;

/// Apply every migration the open database is missing.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let on_disk: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if on_disk > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "schema version {on_disk} is newer than this build supports ({CURRENT_VERSION})"
        )));
    }
    if on_disk == CURRENT_VERSION {
        tracing::debug!(version = on_disk, "schema is up to date");
        return Ok(());
    }

    for (index, up) in STEPS.iter().enumerate().skip(on_disk as usize) {
        let target = index as u32 + 1;
        tracing::info!(version = target, "applying schema migration");
        up(conn).map_err(|e| StoreError::Migration(e.to_string()))?;
        conn.pragma_update(None, "user_version", target)?;
    }

    Ok(())
}
