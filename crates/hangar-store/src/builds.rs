//! CRUD operations for [`Build`] records.
//!
//! Builds are keyed by `(build_number, build_target_id)`; the number alone
//! repeats across targets.  `name` and `create_time` are fixed at creation,
//! the remaining columns track remote state as it changes.  Automated
//! refreshes go through [`Database::partial_update_build`], which leaves the
//! user-owned `manual_download` flag alone.

use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Build, BuildKey, BuildStatus};

impl Database {
    /// Insert a build.  With `or_replace` an existing row under the same
    /// `(build_number, build_target_id)` key is overwritten instead of
    /// failing the unique constraint.
    pub fn create_build(&self, build: &Build, or_replace: bool) -> Result<()> {
        if build.build_target_id.is_nil() {
            return Err(StoreError::Validation(
                "build has no owning build target".into(),
            ));
        }
        let sql = if or_replace {
            "INSERT OR REPLACE INTO builds (
                 build_number, build_target_id, status, name, create_time,
                 icon_path, artifact_name, artifact_size, artifact_path, manual_download)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        } else {
            "INSERT INTO builds (
                 build_number, build_target_id, status, name, create_time,
                 icon_path, artifact_name, artifact_size, artifact_path, manual_download)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        };
        self.conn().execute(
            sql,
            params![
                build.build_number,
                build.build_target_id.to_string(),
                build.status.code(),
                build.name,
                build.create_time.to_rfc3339(),
                build.icon_path,
                build.artifact_name,
                build.artifact_size,
                build.artifact_path,
                build.manual_download,
            ],
        )?;
        Ok(())
    }

    /// Overwrite every mutable column of a build, including the user-owned
    /// `manual_download` flag.
    pub fn update_build(&self, build: &Build) -> Result<()> {
        self.conn().execute(
            "UPDATE builds SET
                 status = ?1, icon_path = ?2, artifact_name = ?3,
                 artifact_size = ?4, artifact_path = ?5, manual_download = ?6
             WHERE build_number = ?7 AND build_target_id = ?8",
            params![
                build.status.code(),
                build.icon_path,
                build.artifact_name,
                build.artifact_size,
                build.artifact_path,
                build.manual_download,
                build.build_number,
                build.build_target_id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Overwrite the remote-refreshable columns of a build, leaving
    /// `manual_download` untouched.  This is the write path for automated
    /// refreshes, which must never clobber a user's download choice.
    pub fn partial_update_build(&self, build: &Build) -> Result<()> {
        self.conn().execute(
            "UPDATE builds SET
                 status = ?1, icon_path = ?2, artifact_name = ?3,
                 artifact_size = ?4, artifact_path = ?5
             WHERE build_number = ?6 AND build_target_id = ?7",
            params![
                build.status.code(),
                build.icon_path,
                build.artifact_name,
                build.artifact_size,
                build.artifact_path,
                build.build_number,
                build.build_target_id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Whether a build exists under the given composite key.
    pub fn has_build(&self, key: &BuildKey) -> Result<bool> {
        let exists: bool = self.conn().query_row(
            "SELECT EXISTS(
                 SELECT 1 FROM builds
                 WHERE build_number = ?1 AND build_target_id = ?2)",
            params![key.build_number, key.build_target_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Fetch a single build by composite key.
    pub fn get_build(&self, key: &BuildKey) -> Result<Build> {
        self.conn()
            .query_row(
                "SELECT build_number, build_target_id, status, name, create_time,
                        icon_path, artifact_name, artifact_size, artifact_path, manual_download
                 FROM builds WHERE build_number = ?1 AND build_target_id = ?2",
                params![key.build_number, key.build_target_id.to_string()],
                row_to_build,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List builds.  Scoped to a target the rows come newest-first by build
    /// number; unscoped they are grouped by target, newest-first within each
    /// group.
    pub fn list_builds(&self, build_target_id: Option<Uuid>) -> Result<Vec<Build>> {
        match build_target_id {
            Some(target) => {
                let mut stmt = self.conn().prepare(
                    "SELECT build_number, build_target_id, status, name, create_time,
                            icon_path, artifact_name, artifact_size, artifact_path, manual_download
                     FROM builds WHERE build_target_id = ?1
                     ORDER BY build_number DESC",
                )?;
                let rows = stmt.query_map(params![target.to_string()], row_to_build)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(StoreError::Sqlite)
            }
            None => {
                let mut stmt = self.conn().prepare(
                    "SELECT build_number, build_target_id, status, name, create_time,
                            icon_path, artifact_name, artifact_size, artifact_path, manual_download
                     FROM builds ORDER BY build_target_id, build_number DESC",
                )?;
                let rows = stmt.query_map([], row_to_build)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(StoreError::Sqlite)
            }
        }
    }

    /// Delete a build by composite key.  Returns `true` if a row was deleted.
    pub fn delete_build(&self, key: &BuildKey) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM builds WHERE build_number = ?1 AND build_target_id = ?2",
            params![key.build_number, key.build_target_id.to_string()],
        )?;
        Ok(affected > 0)
    }

    /// Delete every build of a target.  Returns the number of rows removed.
    pub fn delete_builds_for_target(&self, build_target_id: Uuid) -> Result<usize> {
        let affected = self.conn().execute(
            "DELETE FROM builds WHERE build_target_id = ?1",
            params![build_target_id.to_string()],
        )?;
        Ok(affected)
    }
}

/// Map a `rusqlite::Row` to a [`Build`].
fn row_to_build(row: &rusqlite::Row<'_>) -> rusqlite::Result<Build> {
    let target_str: String = row.get(1)?;
    let build_target_id = Uuid::parse_str(&target_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let status_code: i64 = row.get(2)?;

    let time_str: String = row.get(4)?;
    let create_time = chrono::DateTime::parse_from_rfc3339(&time_str)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&chrono::Utc);

    Ok(Build {
        build_number: row.get(0)?,
        build_target_id,
        status: BuildStatus::from_code(status_code),
        name: row.get(3)?,
        create_time,
        icon_path: row.get(5)?,
        artifact_name: row.get(6)?,
        artifact_size: row.get(7)?,
        artifact_path: row.get(8)?,
        manual_download: row.get(9)?,
    })
}
