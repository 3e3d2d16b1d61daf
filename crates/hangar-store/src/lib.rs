//! # hangar-store
//!
//! Local persistent cache of cloud build metadata, backed by SQLite.
//!
//! The hierarchy mirrors the remote service: profiles own projects, projects
//! own build targets, build targets own builds.  The crate exposes a
//! synchronous `Database` handle that wraps a `rusqlite::Connection` and
//! provides typed CRUD helpers for every domain model, plus a bincode codec
//! for moving entities across thread and process boundaries.

pub mod build_targets;
pub mod builds;
pub mod codec;
pub mod database;
pub mod migrations;
pub mod models;
pub mod profiles;
pub mod projects;

mod error;

pub use database::{Database, SharedDatabase};
pub use error::{Result, StoreError};
pub use models::*;
