//! CRUD operations for [`BuildTarget`] records.

use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::BuildTarget;

impl Database {
    /// Insert a new build target.  Rejects records that are not attached to
    /// a project.
    pub fn create_build_target(&self, target: &BuildTarget) -> Result<()> {
        if target.project_id.is_nil() {
            return Err(StoreError::Validation(
                "build target has no owning project".into(),
            ));
        }
        self.conn().execute(
            "INSERT INTO build_targets (id, project_id, name, platform)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                target.id.to_string(),
                target.project_id.to_string(),
                target.name,
                target.platform,
            ],
        )?;
        Ok(())
    }

    /// Fetch a single build target by UUID.
    pub fn get_build_target(&self, id: Uuid) -> Result<BuildTarget> {
        self.conn()
            .query_row(
                "SELECT id, project_id, name, platform FROM build_targets WHERE id = ?1",
                params![id.to_string()],
                row_to_build_target,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List the build targets of a project, ordered by name.
    pub fn list_build_targets(&self, project_id: Uuid) -> Result<Vec<BuildTarget>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, project_id, name, platform
             FROM build_targets WHERE project_id = ?1 ORDER BY name ASC",
        )?;
        let rows = stmt.query_map(params![project_id.to_string()], row_to_build_target)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    /// Update the mutable fields of a build target (name, platform).
    pub fn update_build_target(&self, target: &BuildTarget) -> Result<()> {
        self.conn().execute(
            "UPDATE build_targets SET name = ?1, platform = ?2 WHERE id = ?3",
            params![target.name, target.platform, target.id.to_string()],
        )?;
        Ok(())
    }

    /// Delete a build target by UUID.  Returns `true` if a row was deleted.
    pub fn delete_build_target(&self, id: Uuid) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM build_targets WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(affected > 0)
    }
}

/// Map a `rusqlite::Row` to a [`BuildTarget`].
fn row_to_build_target(row: &rusqlite::Row<'_>) -> rusqlite::Result<BuildTarget> {
    let id_str: String = row.get(0)?;
    let project_id_str: String = row.get(1)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let project_id = Uuid::parse_str(&project_id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(BuildTarget {
        id,
        project_id,
        name: row.get(2)?,
        platform: row.get(3)?,
    })
}
