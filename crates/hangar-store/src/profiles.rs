//! CRUD operations for [`Profile`] records.

use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Profile;

impl Database {
    /// Insert a new profile.
    pub fn create_profile(&self, profile: &Profile) -> Result<()> {
        self.conn().execute(
            "INSERT INTO profiles (id, name, api_key, root_path)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                profile.id.to_string(),
                profile.name,
                profile.api_key,
                profile.root_path,
            ],
        )?;
        Ok(())
    }

    /// Fetch a single profile by UUID.  The `projects` list is left empty;
    /// load it separately with [`Database::list_projects`].
    pub fn get_profile(&self, id: Uuid) -> Result<Profile> {
        self.conn()
            .query_row(
                "SELECT id, name, api_key, root_path FROM profiles WHERE id = ?1",
                params![id.to_string()],
                row_to_profile,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List all profiles, ordered by name.
    pub fn list_profiles(&self) -> Result<Vec<Profile>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, name, api_key, root_path FROM profiles ORDER BY name ASC")?;
        let rows = stmt.query_map([], row_to_profile)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    /// Update the mutable fields of a profile (name, API key, root path).
    pub fn update_profile(&self, profile: &Profile) -> Result<()> {
        self.conn().execute(
            "UPDATE profiles SET name = ?1, api_key = ?2, root_path = ?3 WHERE id = ?4",
            params![
                profile.name,
                profile.api_key,
                profile.root_path,
                profile.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Delete a profile by UUID.  Returns `true` if a row was deleted.
    /// Owned projects, build targets and builds go with it (ON DELETE
    /// CASCADE).
    pub fn delete_profile(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM profiles WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }

    /// Fetch just the API key of a profile.  Used by the sync layer to
    /// authenticate a listing fetch without loading the whole record.
    pub fn get_api_key(&self, profile_id: Uuid) -> Result<String> {
        self.conn()
            .query_row(
                "SELECT api_key FROM profiles WHERE id = ?1",
                params![profile_id.to_string()],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Whether at least one profile exists.  Drives the first-run flow of an
    /// embedding application.
    pub fn has_profiles(&self) -> Result<bool> {
        let count: i64 =
            self.conn()
                .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))?;
        Ok(count > 0)
    }
}

/// Map a `rusqlite::Row` to a [`Profile`].
fn row_to_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<Profile> {
    let id_str: String = row.get(0)?;
    let name: String = row.get(1)?;
    let api_key: String = row.get(2)?;
    let root_path: String = row.get(3)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Profile {
        id,
        name,
        api_key,
        root_path,
        projects: Vec::new(),
    })
}
