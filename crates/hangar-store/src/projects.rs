//! CRUD operations for [`Project`] records.
//!
//! Projects are owned by a profile and identified locally by UUID.  The
//! remote listing identifier (`cloud_id`) is unique per profile, which is
//! what lets the sync layer match remote rows to local ones.

use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Project;

impl Database {
    /// Insert a new project.  Rejects records that are not attached to a
    /// profile.
    pub fn create_project(&self, project: &Project) -> Result<()> {
        if project.profile_id.is_nil() {
            return Err(StoreError::Validation(
                "project has no owning profile".into(),
            ));
        }
        self.conn().execute(
            "INSERT INTO projects (id, profile_id, cloud_id, org_id, name, icon_path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                project.id.to_string(),
                project.profile_id.to_string(),
                project.cloud_id,
                project.org_id,
                project.name,
                project.icon_path,
            ],
        )?;
        Ok(())
    }

    /// Fetch a single project by UUID.  Build targets are not loaded.
    pub fn get_project(&self, id: Uuid) -> Result<Project> {
        self.conn()
            .query_row(
                "SELECT id, profile_id, cloud_id, org_id, name, icon_path
                 FROM projects WHERE id = ?1",
                params![id.to_string()],
                row_to_project,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List the projects of a profile in insertion order, so a reload
    /// reproduces the order the rows were appended in.  With
    /// `include_build_targets` the child targets are loaded per project.
    pub fn list_projects(
        &self,
        profile_id: Uuid,
        include_build_targets: bool,
    ) -> Result<Vec<Project>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, profile_id, cloud_id, org_id, name, icon_path
             FROM projects WHERE profile_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![profile_id.to_string()], row_to_project)?;
        let mut projects = rows
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)?;

        if include_build_targets {
            for project in &mut projects {
                project.build_targets = self.list_build_targets(project.id)?;
            }
        }
        Ok(projects)
    }

    /// Update the remote-refreshable fields of a project (name, organisation,
    /// icon path).  Ownership and the cloud identifier never change after
    /// creation.
    pub fn update_project(&self, project: &Project) -> Result<()> {
        self.conn().execute(
            "UPDATE projects SET name = ?1, org_id = ?2, icon_path = ?3 WHERE id = ?4",
            params![
                project.name,
                project.org_id,
                project.icon_path,
                project.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Delete a project by UUID.  Returns `true` if a row was deleted.
    pub fn delete_project(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM projects WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }
}

/// Map a `rusqlite::Row` to a [`Project`].
fn row_to_project(row: &rusqlite::Row<'_>) -> rusqlite::Result<Project> {
    let id_str: String = row.get(0)?;
    let profile_id_str: String = row.get(1)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let profile_id = Uuid::parse_str(&profile_id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Project {
        id,
        profile_id,
        cloud_id: row.get(2)?,
        org_id: row.get(3)?,
        name: row.get(4)?,
        icon_path: row.get(5)?,
        build_targets: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuildTarget, Profile};

    fn seeded_db() -> (Database, Profile) {
        let db = Database::open_in_memory().unwrap();
        let profile = Profile {
            id: Uuid::new_v4(),
            name: "work".into(),
            api_key: "key".into(),
            root_path: "/builds".into(),
            projects: Vec::new(),
        };
        db.create_profile(&profile).unwrap();
        (db, profile)
    }

    fn sample_project(profile_id: Uuid, cloud_id: &str) -> Project {
        Project {
            id: Uuid::new_v4(),
            profile_id,
            cloud_id: cloud_id.to_string(),
            org_id: "org".into(),
            name: format!("project-{cloud_id}"),
            icon_path: String::new(),
            build_targets: Vec::new(),
        }
    }

    #[test]
    fn create_and_get() {
        let (db, profile) = seeded_db();
        let project = sample_project(profile.id, "alpha");

        db.create_project(&project).unwrap();
        assert_eq!(db.get_project(project.id).unwrap(), project);
    }

    #[test]
    fn orphan_project_is_rejected() {
        let (db, _) = seeded_db();
        let project = sample_project(Uuid::nil(), "alpha");

        let err = db.create_project(&project).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn duplicate_cloud_id_per_profile_is_rejected() {
        let (db, profile) = seeded_db();
        db.create_project(&sample_project(profile.id, "alpha"))
            .unwrap();

        let err = db
            .create_project(&sample_project(profile.id, "alpha"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[test]
    fn list_preserves_insertion_order() {
        let (db, profile) = seeded_db();
        db.create_project(&sample_project(profile.id, "zeta"))
            .unwrap();
        db.create_project(&sample_project(profile.id, "alpha"))
            .unwrap();
        db.create_project(&sample_project(profile.id, "mid"))
            .unwrap();

        let ids: Vec<String> = db
            .list_projects(profile.id, false)
            .unwrap()
            .into_iter()
            .map(|p| p.cloud_id)
            .collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn list_scopes_to_profile() {
        let (db, profile) = seeded_db();
        let other = Profile {
            id: Uuid::new_v4(),
            name: "personal".into(),
            api_key: "key2".into(),
            root_path: "/other".into(),
            projects: Vec::new(),
        };
        db.create_profile(&other).unwrap();

        db.create_project(&sample_project(profile.id, "alpha"))
            .unwrap();
        db.create_project(&sample_project(other.id, "beta"))
            .unwrap();

        assert_eq!(db.list_projects(profile.id, false).unwrap().len(), 1);
        assert_eq!(db.list_projects(other.id, false).unwrap().len(), 1);
    }

    #[test]
    fn list_can_load_build_targets() {
        let (db, profile) = seeded_db();
        let project = sample_project(profile.id, "alpha");
        db.create_project(&project).unwrap();

        let target = BuildTarget {
            id: Uuid::new_v4(),
            project_id: project.id,
            name: "standalone".into(),
            platform: "linux".into(),
        };
        db.create_build_target(&target).unwrap();

        let loaded = db.list_projects(profile.id, true).unwrap();
        assert_eq!(loaded[0].build_targets, vec![target]);
    }

    #[test]
    fn update_touches_refreshable_fields_only() {
        let (db, profile) = seeded_db();
        let mut project = sample_project(profile.id, "alpha");
        db.create_project(&project).unwrap();

        project.name = "renamed".into();
        project.org_id = "new-org".into();
        project.icon_path = "/icons/alpha.png".into();
        db.update_project(&project).unwrap();

        let fetched = db.get_project(project.id).unwrap();
        assert_eq!(fetched.name, "renamed");
        assert_eq!(fetched.org_id, "new-org");
        assert_eq!(fetched.icon_path, "/icons/alpha.png");
        assert_eq!(fetched.cloud_id, "alpha");
    }

    #[test]
    fn deleting_the_profile_cascades() {
        let (db, profile) = seeded_db();
        let project = sample_project(profile.id, "alpha");
        db.create_project(&project).unwrap();

        db.delete_profile(profile.id).unwrap();
        assert!(matches!(
            db.get_project(project.id).unwrap_err(),
            StoreError::NotFound
        ));
    }

    #[test]
    fn delete_reports_whether_a_row_went_away() {
        let (db, profile) = seeded_db();
        let project = sample_project(profile.id, "alpha");
        db.create_project(&project).unwrap();

        assert!(db.delete_project(project.id).unwrap());
        assert!(!db.delete_project(project.id).unwrap());
    }
}
