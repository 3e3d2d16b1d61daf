//! Shared fixtures for the crate's tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use hangar_cloud::{CloudError, CloudProject, ProjectSource};
use hangar_store::{Database, Profile, Project, SharedDatabase};

use crate::collection::ProjectCollection;
use crate::events::ListChange;

/// Scripted [`ProjectSource`] that pops one response per call and counts
/// the calls it served.
pub(crate) struct MockSource {
    responses: Mutex<VecDeque<Result<Vec<CloudProject>, CloudError>>>,
    calls: AtomicUsize,
}

impl MockSource {
    pub(crate) fn with(responses: Vec<Result<Vec<CloudProject>, CloudError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProjectSource for MockSource {
    async fn fetch_projects(&self, _api_key: &str) -> Result<Vec<CloudProject>, CloudError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub(crate) fn remote(cloud_id: &str, name: &str) -> CloudProject {
    CloudProject {
        cloud_id: cloud_id.to_string(),
        org_id: "org".to_string(),
        name: name.to_string(),
        icon_path: String::new(),
    }
}

pub(crate) fn api_error() -> CloudError {
    CloudError::Api {
        status: 500,
        body: "boom".to_string(),
    }
}

/// In-memory database with one profile already created.
pub(crate) fn shared_db_with_profile() -> (SharedDatabase, Uuid) {
    let db = Database::open_in_memory().unwrap();
    let id = Uuid::new_v4();
    db.create_profile(&Profile {
        id,
        name: "test".to_string(),
        api_key: "key".to_string(),
        root_path: "/tmp/builds".to_string(),
        projects: Vec::new(),
    })
    .unwrap();
    (db.into_shared(), id)
}

pub(crate) fn add_profile(db: &SharedDatabase, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    db.lock()
        .unwrap()
        .create_profile(&Profile {
            id,
            name: name.to_string(),
            api_key: "key".to_string(),
            root_path: "/tmp/builds".to_string(),
            projects: Vec::new(),
        })
        .unwrap();
    id
}

/// Persist `(cloud_id, name)` projects for the profile, in the given order.
pub(crate) fn seed_projects(
    db: &SharedDatabase,
    profile_id: Uuid,
    entries: &[(&str, &str)],
) -> Vec<Project> {
    let guard = db.lock().unwrap();
    let mut out = Vec::new();
    for (cloud_id, name) in entries {
        let project = Project {
            id: Uuid::new_v4(),
            profile_id,
            cloud_id: (*cloud_id).to_string(),
            org_id: "org".to_string(),
            name: (*name).to_string(),
            icon_path: String::new(),
            build_targets: Vec::new(),
        };
        guard.create_project(&project).unwrap();
        out.push(project);
    }
    out
}

/// A collection bound to the database and profile.
pub(crate) fn bound_collection(
    source: Arc<MockSource>,
    db: &SharedDatabase,
    profile_id: Uuid,
) -> ProjectCollection {
    let mut col = ProjectCollection::new(source as Arc<dyn ProjectSource>);
    col.set_database(Some(Arc::clone(db))).unwrap();
    col.set_profile(Some(profile_id)).unwrap();
    col
}

/// Collect every change already queued on the receiver.
pub(crate) fn drain_changes(
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<ListChange>,
) -> Vec<ListChange> {
    let mut out = Vec::new();
    while let Ok(change) = rx.try_recv() {
        out.push(change);
    }
    out
}
