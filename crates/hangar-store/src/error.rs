use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A CRUD statement failed at the SQLite engine (constraint violation,
    /// I/O error, malformed schema).  Carries the engine diagnostic.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A query expected exactly one row but found none.
    #[error("Record not found")]
    NotFound,

    /// Schema creation or upgrade failure.  The database cannot be used;
    /// fatal to the opening flow.
    #[error("Migration error: {0}")]
    Migration(String),

    /// A record was rejected before any statement was issued.
    #[error("Invalid record: {0}")]
    Validation(String),

    /// Byte-stream encode/decode failure in the [`crate::codec`] module.
    #[error("Serialization error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
