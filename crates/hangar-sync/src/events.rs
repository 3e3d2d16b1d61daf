//! Change notifications and the row-model surface consumed by UI layers.
//!
//! Internal code works with typed [`Project`](hangar_store::Project) values.
//! The enumerated field selector exists only at this boundary, where a UI
//! binding addresses cells by (row, field) pairs.

use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::SyncError;

/// Fields of a project row addressable through the collection boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProjectField {
    ProjectId,
    ProfileId,
    CloudId,
    OrganisationId,
    Name,
    IconPath,
}

/// A value read from or written into a single cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldValue {
    Id(Uuid),
    Text(String),
}

/// Fine-grained notifications emitted as the listing changes.
///
/// Reconciliation and consumer edits only ever emit the three granular
/// variants; `Reset` is reserved for rebinding the collection, so observers
/// can keep incremental rendering cheap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ListChange {
    /// The whole listing was reloaded, re-read everything.
    Reset,
    /// `count` rows were inserted starting at `start`.
    Inserted { start: usize, count: usize },
    /// `count` rows were removed starting at `start`.
    Removed { start: usize, count: usize },
    /// The row at `index` changed in exactly `fields`.
    Updated {
        index: usize,
        fields: Vec<ProjectField>,
    },
}

/// Row-model surface a UI layer binds to.
///
/// Implemented directly by [`ProjectCollection`](crate::ProjectCollection),
/// no framework base type involved.  `Ok(false)` from a mutator means the
/// operation was rejected (out of bounds, read-only field); `Err` means
/// storage failed underneath it.
pub trait RowModel {
    type Field;
    type Value;
    type Change;

    /// Number of rows currently in the listing.
    fn row_count(&self) -> usize;

    /// Read one cell.  `None` when `index` is out of bounds.
    fn cell(&self, index: usize, field: Self::Field) -> Option<Self::Value>;

    /// Write one cell, persisting before the in-memory listing changes.
    fn set_cell(
        &mut self,
        index: usize,
        field: Self::Field,
        value: Self::Value,
    ) -> Result<bool, SyncError>;

    /// Direct insertion is not part of the surface; rows arrive through
    /// reconciliation or an explicit append.
    fn insert_rows(&mut self, _start: usize, _count: usize) -> Result<bool, SyncError> {
        Ok(false)
    }

    /// Remove `count` rows starting at `start`.
    fn remove_rows(&mut self, start: usize, count: usize) -> Result<bool, SyncError>;

    /// Hand out the change receiver.  Yields `Some` exactly once.
    fn take_changes(&mut self) -> Option<mpsc::UnboundedReceiver<Self::Change>>;
}
