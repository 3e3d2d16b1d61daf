//! Composition root for the sync stack.
//!
//! Opens the database, builds the HTTP client, issues the startup warm-up,
//! and hands out bound [`ProjectCollection`]s.  Everything is wired here
//! explicitly; nothing registers itself through process-global state.

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use hangar_cloud::{CloudClient, CloudConfig, Preconnect, ProjectSource};
use hangar_store::{Database, SharedDatabase};

use crate::collection::ProjectCollection;
use crate::error::SyncError;

/// Owns the shared database handle, the remote source, and the warm-up job.
pub struct SyncRuntime {
    db: SharedDatabase,
    source: Arc<dyn ProjectSource>,
    preconnect: Option<Preconnect>,
}

impl SyncRuntime {
    /// Open the runtime against the real service.  With `db_path` the
    /// database lives there, otherwise at the platform data directory.
    /// Spawns the warm-up job, so this must run inside a tokio runtime.
    pub fn open(db_path: Option<&Path>, config: CloudConfig) -> Result<Self, SyncError> {
        let db = match db_path {
            Some(path) => Database::open_at(path)?,
            None => Database::new()?,
        };
        let client = CloudClient::new(&config)?;
        let preconnect = Preconnect::spawn(&config);

        info!("sync runtime ready");
        Ok(Self {
            db: db.into_shared(),
            source: Arc::new(client),
            preconnect: Some(preconnect),
        })
    }

    /// Build the runtime around an existing database and a custom source.
    /// No warm-up job is issued.
    pub fn with_source(db: Database, source: Arc<dyn ProjectSource>) -> Self {
        Self {
            db: db.into_shared(),
            source,
            preconnect: None,
        }
    }

    /// Clone of the shared database handle.
    pub fn database(&self) -> SharedDatabase {
        Arc::clone(&self.db)
    }

    /// A collection bound to this runtime's database and the given profile,
    /// loaded from local storage and ready to fetch.
    pub fn projects(&self, profile_id: Uuid) -> Result<ProjectCollection, SyncError> {
        let mut collection = ProjectCollection::new(Arc::clone(&self.source));
        collection.set_database(Some(self.database()))?;
        collection.set_profile(Some(profile_id))?;
        Ok(collection)
    }

    /// Stop the warm-up job if it is still running.  Harmless after it
    /// finished or when none was issued.
    pub fn cancel_preconnect(&mut self) {
        if let Some(job) = self.preconnect.take() {
            job.cancel();
        }
    }
}
