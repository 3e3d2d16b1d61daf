//! # hangar-sync
//!
//! Keeps the locally cached project listing of a profile in line with the
//! remote build service.  A [`ProjectCollection`] loads instantly from the
//! local store, fetches the remote listing at most once on demand,
//! reconciles the two, and reports every change through fine-grained
//! notifications a UI layer can apply incrementally.

pub mod collection;
pub mod events;
pub mod reconcile;
pub mod runtime;

mod error;

#[cfg(test)]
mod testutil;

pub use collection::{ProjectCollection, SyncState};
pub use error::SyncError;
pub use events::{FieldValue, ListChange, ProjectField, RowModel};
pub use reconcile::ReconcileOutcome;
pub use runtime::SyncRuntime;
