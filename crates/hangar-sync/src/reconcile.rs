//! One-way reconciliation of the local project listing against the remote
//! listing.  Remote wins: local rows with no remote counterpart go away,
//! matched rows take the remote display fields, unmatched remote entries are
//! appended.

use hangar_cloud::CloudProject;

use crate::collection::ProjectCollection;
use crate::error::SyncError;

/// Counts of the mutations one reconciliation pass applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub removed: usize,
    pub updated: usize,
    pub added: usize,
}

impl ReconcileOutcome {
    /// Whether the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.removed == 0 && self.updated == 0 && self.added == 0
    }
}

/// Bring the collection's listing in line with `remote`.
///
/// Walks the local listing from the highest index down so a removal never
/// shifts an index that is still to be visited.  Matching is strictly by
/// cloud id; an id present on both sides is always an in-place update,
/// never a remove plus re-add, which keeps local identities stable.  New
/// remote entries are appended in the order the service returned them.
pub(crate) fn apply(
    collection: &mut ProjectCollection,
    remote: &[CloudProject],
) -> Result<ReconcileOutcome, SyncError> {
    let mut outcome = ReconcileOutcome::default();

    let mut index = collection.rows().len();
    while index > 0 {
        index -= 1;
        let cloud_id = collection.rows()[index].cloud_id.clone();
        match remote.iter().find(|r| r.cloud_id == cloud_id) {
            None => {
                collection.remove_row(index)?;
                outcome.removed += 1;
            }
            Some(matched) => {
                if collection.refresh_row(index, matched)? {
                    outcome.updated += 1;
                }
            }
        }
    }

    for entry in remote {
        let known = collection
            .rows()
            .iter()
            .any(|p| p.cloud_id == entry.cloud_id);
        if !known {
            collection.append_remote(entry)?;
            outcome.added += 1;
        }
    }

    Ok(outcome)
}
