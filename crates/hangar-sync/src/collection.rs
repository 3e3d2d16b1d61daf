//! Observable project listing for one profile.
//!
//! The collection owns an ordered, indexed view of the profile's projects.
//! It loads instantly from the local store, fetches the remote listing at
//! most once on demand, and reconciles the two when the fetch lands.  All
//! collection and storage state lives on the owner thread; the fetch runs
//! as a background task and reports back over a channel, tagged with a
//! generation counter so a result that outlives its binding is discarded
//! instead of applied.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use hangar_cloud::{CloudError, CloudProject, ProjectSource};
use hangar_store::{Database, Project, SharedDatabase};

use crate::error::SyncError;
use crate::events::{FieldValue, ListChange, ProjectField, RowModel};
use crate::reconcile::{self, ReconcileOutcome};

/// Sync lifecycle of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No fetch issued yet for the current binding; a fetch may be started.
    Unsynced,
    /// Exactly one fetch is in flight.
    Syncing,
    /// A fetch completed for the current binding; no further fetch is issued.
    Synced,
}

/// What the background fetch task reports back to the owner.
#[derive(Debug)]
struct FetchReply {
    generation: u64,
    result: Result<Vec<CloudProject>, CloudError>,
}

/// Ordered, observable view of one profile's projects.
pub struct ProjectCollection {
    db: Option<SharedDatabase>,
    profile_id: Option<Uuid>,
    source: Arc<dyn ProjectSource>,

    rows: Vec<Project>,
    state: SyncState,
    /// Bumped on every rebind; fetches carry the value they were issued
    /// under, replies with an older value are stale.
    generation: u64,

    events_tx: mpsc::UnboundedSender<ListChange>,
    events_rx: Option<mpsc::UnboundedReceiver<ListChange>>,
    reply_tx: mpsc::UnboundedSender<FetchReply>,
    reply_rx: mpsc::UnboundedReceiver<FetchReply>,
}

impl ProjectCollection {
    /// Create an unbound collection.  Bind it with [`set_database`] and
    /// [`set_profile`] before anything useful happens.
    ///
    /// [`set_database`]: ProjectCollection::set_database
    /// [`set_profile`]: ProjectCollection::set_profile
    pub fn new(source: Arc<dyn ProjectSource>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();

        Self {
            db: None,
            profile_id: None,
            source,
            rows: Vec::new(),
            state: SyncState::Unsynced,
            generation: 0,
            events_tx,
            events_rx: Some(events_rx),
            reply_tx,
            reply_rx,
        }
    }

    // ---- binding ----

    /// Bind or unbind the backing database.  Rebinding reloads the listing
    /// from storage and drops back to `Unsynced`; binding the same handle
    /// again is a no-op.
    pub fn set_database(&mut self, db: Option<SharedDatabase>) -> Result<(), SyncError> {
        let unchanged = match (&self.db, &db) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        if unchanged {
            return Ok(());
        }

        self.db = db;
        self.reload()
    }

    /// Bind or unbind the profile whose projects this collection shows.
    /// Same reload semantics as [`ProjectCollection::set_database`].
    pub fn set_profile(&mut self, profile_id: Option<Uuid>) -> Result<(), SyncError> {
        if self.profile_id == profile_id {
            return Ok(());
        }

        self.profile_id = profile_id;
        self.reload()
    }

    fn reload(&mut self) -> Result<(), SyncError> {
        self.generation = self.generation.wrapping_add(1);
        self.state = SyncState::Unsynced;
        self.rows.clear();

        let loaded = match (self.db.is_some(), self.profile_id) {
            (true, Some(profile_id)) => Some(self.with_db(|db| db.list_projects(profile_id, false))),
            _ => None,
        };

        match loaded {
            Some(Ok(rows)) => self.rows = rows,
            Some(Err(e)) => {
                self.emit(ListChange::Reset);
                return Err(e);
            }
            None => {}
        }

        self.emit(ListChange::Reset);
        Ok(())
    }

    // ---- accessors ----

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn profile_id(&self) -> Option<Uuid> {
        self.profile_id
    }

    /// The listing in display order.
    pub fn rows(&self) -> &[Project] {
        &self.rows
    }

    /// Typed row access.  `None` when `index` is out of bounds.
    pub fn project_at(&self, index: usize) -> Option<&Project> {
        self.rows.get(index)
    }

    // ---- syncing ----

    /// Whether a fetch may be started: bound, and none issued yet for this
    /// binding.
    pub fn can_fetch_more(&self) -> bool {
        self.state == SyncState::Unsynced && self.db.is_some() && self.profile_id.is_some()
    }

    /// Start the one-shot remote fetch.  Returns `Ok(false)` without
    /// touching the network when no fetch may be started (unbound, already
    /// syncing, or already synced).  Must run inside a tokio runtime.
    pub fn fetch_more(&mut self) -> Result<bool, SyncError> {
        if !self.can_fetch_more() {
            return Ok(false);
        }
        let profile_id = self.profile_id.ok_or(SyncError::Unbound)?;

        let api_key = self.with_db(|db| db.get_api_key(profile_id))?;
        let source = Arc::clone(&self.source);
        let reply_tx = self.reply_tx.clone();
        let generation = self.generation;

        tokio::spawn(async move {
            let result = source.fetch_projects(&api_key).await;
            let _ = reply_tx.send(FetchReply { generation, result });
        });

        self.state = SyncState::Syncing;
        info!(profile = %profile_id, "project sync started");
        Ok(true)
    }

    /// Wait for the in-flight fetch to land and apply it.  Returns the
    /// applied outcome, or `Ok(None)` when nothing was in flight or the
    /// reply turned out stale.  A failed fetch drops the collection back to
    /// `Unsynced` so a later [`fetch_more`] can retry; the locally cached
    /// listing is left untouched.
    ///
    /// [`fetch_more`]: ProjectCollection::fetch_more
    pub async fn complete_sync(&mut self) -> Result<Option<ReconcileOutcome>, SyncError> {
        while self.state == SyncState::Syncing {
            let Some(reply) = self.reply_rx.recv().await else {
                return Ok(None);
            };
            if let Some(outcome) = self.handle_reply(reply)? {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    /// Apply any fetch replies that have already landed, without blocking.
    /// Returns the outcome of the last reply applied, if any.
    pub fn pump(&mut self) -> Result<Option<ReconcileOutcome>, SyncError> {
        let mut applied = None;
        while let Ok(reply) = self.reply_rx.try_recv() {
            if let Some(outcome) = self.handle_reply(reply)? {
                applied = Some(outcome);
            }
        }
        Ok(applied)
    }

    fn handle_reply(&mut self, reply: FetchReply) -> Result<Option<ReconcileOutcome>, SyncError> {
        if reply.generation != self.generation {
            debug!(
                got = reply.generation,
                current = self.generation,
                "discarding stale fetch result"
            );
            return Ok(None);
        }

        match reply.result {
            Ok(remote) => match reconcile::apply(self, &remote) {
                Ok(outcome) => {
                    self.state = SyncState::Synced;
                    info!(
                        removed = outcome.removed,
                        updated = outcome.updated,
                        added = outcome.added,
                        "project sync applied"
                    );
                    Ok(Some(outcome))
                }
                Err(e) => {
                    // The pass stops at a consistent prefix; drop back so a
                    // later fetch can retry.
                    self.state = SyncState::Unsynced;
                    warn!(error = %e, "project sync apply failed");
                    Err(e)
                }
            },
            Err(e) => {
                self.state = SyncState::Unsynced;
                warn!(error = %e, "project sync failed");
                Err(SyncError::Cloud(e))
            }
        }
    }

    // ---- consumer mutations ----

    /// Append a project.  The bound profile's identity is stamped on it and
    /// a local id is assigned when the template carries none.
    pub fn add_project(&mut self, template: Project) -> Result<(), SyncError> {
        let profile_id = self.profile_id.ok_or(SyncError::Unbound)?;

        let mut project = template;
        project.profile_id = profile_id;
        if project.id.is_nil() {
            project.id = Uuid::new_v4();
        }

        self.with_db(|db| db.create_project(&project))?;
        self.rows.push(project);
        self.emit(ListChange::Inserted {
            start: self.rows.len() - 1,
            count: 1,
        });
        Ok(())
    }

    // ---- reconciler hooks ----

    pub(crate) fn remove_row(&mut self, index: usize) -> Result<(), SyncError> {
        let id = self.rows[index].id;
        self.with_db(|db| db.delete_project(id).map(|_| ()))?;
        self.rows.remove(index);
        self.emit(ListChange::Removed {
            start: index,
            count: 1,
        });
        Ok(())
    }

    /// Take the remote display fields into the row at `index`.  Returns
    /// whether anything differed.
    pub(crate) fn refresh_row(
        &mut self,
        index: usize,
        matched: &CloudProject,
    ) -> Result<bool, SyncError> {
        let current = &self.rows[index];

        let mut fields = Vec::new();
        if current.name != matched.name {
            fields.push(ProjectField::Name);
        }
        if current.icon_path != matched.icon_path {
            fields.push(ProjectField::IconPath);
        }
        if fields.is_empty() {
            return Ok(false);
        }

        let mut updated = current.clone();
        updated.name = matched.name.clone();
        updated.icon_path = matched.icon_path.clone();

        self.with_db(|db| db.update_project(&updated))?;
        self.rows[index] = updated;
        self.emit(ListChange::Updated { index, fields });
        Ok(true)
    }

    pub(crate) fn append_remote(&mut self, entry: &CloudProject) -> Result<(), SyncError> {
        let profile_id = self.profile_id.ok_or(SyncError::Unbound)?;

        let project = Project {
            id: Uuid::new_v4(),
            profile_id,
            cloud_id: entry.cloud_id.clone(),
            org_id: entry.org_id.clone(),
            name: entry.name.clone(),
            icon_path: entry.icon_path.clone(),
            build_targets: Vec::new(),
        };

        self.with_db(|db| db.create_project(&project))?;
        self.rows.push(project);
        self.emit(ListChange::Inserted {
            start: self.rows.len() - 1,
            count: 1,
        });
        Ok(())
    }

    // ---- plumbing ----

    fn with_db<T>(
        &self,
        f: impl FnOnce(&Database) -> hangar_store::Result<T>,
    ) -> Result<T, SyncError> {
        let db = self.db.as_ref().ok_or(SyncError::Unbound)?;
        let guard = db.lock().map_err(|_| SyncError::LockPoisoned)?;
        f(&guard).map_err(SyncError::Store)
    }

    fn emit(&self, change: ListChange) {
        let _ = self.events_tx.send(change);
    }
}

impl RowModel for ProjectCollection {
    type Field = ProjectField;
    type Value = FieldValue;
    type Change = ListChange;

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, index: usize, field: ProjectField) -> Option<FieldValue> {
        let project = self.rows.get(index)?;
        Some(match field {
            ProjectField::ProjectId => FieldValue::Id(project.id),
            ProjectField::ProfileId => FieldValue::Id(project.profile_id),
            ProjectField::CloudId => FieldValue::Text(project.cloud_id.clone()),
            ProjectField::OrganisationId => FieldValue::Text(project.org_id.clone()),
            ProjectField::Name => FieldValue::Text(project.name.clone()),
            ProjectField::IconPath => FieldValue::Text(project.icon_path.clone()),
        })
    }

    fn set_cell(
        &mut self,
        index: usize,
        field: ProjectField,
        value: FieldValue,
    ) -> Result<bool, SyncError> {
        if index >= self.rows.len() {
            return Ok(false);
        }

        let mut updated = self.rows[index].clone();
        let fields = match (field, value) {
            (ProjectField::Name, FieldValue::Text(name)) => {
                updated.name = name;
                vec![ProjectField::Name]
            }
            (ProjectField::IconPath, FieldValue::Text(path)) => {
                updated.icon_path = path;
                vec![ProjectField::IconPath]
            }
            // Identities and ownership are not editable through the boundary.
            _ => return Ok(false),
        };

        self.with_db(|db| db.update_project(&updated))?;
        self.rows[index] = updated;
        self.emit(ListChange::Updated { index, fields });
        Ok(true)
    }

    fn remove_rows(&mut self, start: usize, count: usize) -> Result<bool, SyncError> {
        let end = match start.checked_add(count) {
            Some(end) if count > 0 && end <= self.rows.len() => end,
            _ => return Ok(false),
        };

        for project in &self.rows[start..end] {
            let id = project.id;
            self.with_db(|db| db.delete_project(id).map(|_| ()))?;
        }
        self.rows.drain(start..end);
        self.emit(ListChange::Removed { start, count });
        Ok(true)
    }

    fn take_changes(&mut self) -> Option<mpsc::UnboundedReceiver<ListChange>> {
        self.events_rx.take()
    }
}
