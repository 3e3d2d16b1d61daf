use thiserror::Error;

/// Errors from the sync layer.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A storage operation failed.
    #[error("storage error: {0}")]
    Store(#[from] hangar_store::StoreError),

    /// The remote fetch failed.
    #[error("cloud error: {0}")]
    Cloud(#[from] hangar_cloud::CloudError),

    /// The collection has no database or profile bound.
    #[error("collection is not bound to a database and profile")]
    Unbound,

    /// The shared database lock was poisoned by a panicking holder.
    #[error("database lock poisoned")]
    LockPoisoned,
}
