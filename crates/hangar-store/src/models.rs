//! Domain model structs persisted in the local SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed to
//! a UI layer over IPC or run through the byte-stream codec in
//! [`crate::codec`].  Equality is plain field-for-field comparison; local
//! identity never participates implicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// A set of credentials plus the local directory builds are mirrored into.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Unique profile identifier (local).
    pub id: Uuid,
    /// Human-readable profile name.
    pub name: String,
    /// API key used to authenticate against the remote build service.
    pub api_key: String,
    /// Root directory where downloaded artifacts are stored.
    pub root_path: String,
    /// Projects owned by this profile.  Populated for serialization; loaded
    /// flat (empty) by the store queries.
    pub projects: Vec<Project>,
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A cloud project cached locally.
///
/// `id` is stable only on this machine; `cloud_id` is the remote service's
/// identity and the key reconciliation matches on.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    /// Unique project identifier (local).
    pub id: Uuid,
    /// The profile this project belongs to.
    pub profile_id: Uuid,
    /// Remote identity, unique among the projects of one profile.
    pub cloud_id: String,
    /// Remote organisation the project lives under.
    pub org_id: String,
    /// Display name.
    pub name: String,
    /// Path or URL of the project icon.
    pub icon_path: String,
    /// Build targets owned by this project.  Populated on request.
    pub build_targets: Vec<BuildTarget>,
}

// ---------------------------------------------------------------------------
// BuildTarget
// ---------------------------------------------------------------------------

/// A per-platform build configuration of a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildTarget {
    /// Unique build target identifier (local).
    pub id: Uuid,
    /// The project this target belongs to.
    pub project_id: Uuid,
    /// Display name.
    pub name: String,
    /// Platform tag (e.g. `ios`, `android`, `standalonewindows64`), used by
    /// the UI to pick an icon.
    pub platform: String,
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Lifecycle state of a remote build, persisted as a tiny integer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[repr(u8)]
pub enum BuildStatus {
    Unknown = 0,
    Queued = 1,
    SentToBuilder = 2,
    Started = 3,
    Restarted = 4,
    Success = 5,
    Failure = 6,
    Canceled = 7,
}

impl BuildStatus {
    /// Decode a persisted status code.  Unrecognized codes map to `Unknown`
    /// so old databases survive enum growth.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Queued,
            2 => Self::SentToBuilder,
            3 => Self::Started,
            4 => Self::Restarted,
            5 => Self::Success,
            6 => Self::Failure,
            7 => Self::Canceled,
            _ => Self::Unknown,
        }
    }

    /// The persisted status code.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// One build produced by the remote service for a build target.
///
/// Builds are numbered per target; `(build_number, build_target_id)` is the
/// composite primary key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Build {
    /// Per-target build number assigned by the remote service.
    pub build_number: i64,
    /// The build target this build belongs to.
    pub build_target_id: Uuid,
    /// Lifecycle state.
    pub status: BuildStatus,
    /// Display name.
    pub name: String,
    /// When the remote service created the build.
    pub create_time: DateTime<Utc>,
    /// Path or URL of the build icon.
    pub icon_path: String,
    /// File name of the downloadable artifact.
    pub artifact_name: String,
    /// Artifact size in bytes.
    pub artifact_size: i64,
    /// Absolute local path of the artifact once downloaded.
    pub artifact_path: Option<String>,
    /// Whether the user must trigger the download explicitly.  Automated
    /// status refreshes must never overwrite this flag.
    pub manual_download: bool,
}

/// The composite key identifying one [`Build`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BuildKey {
    pub build_number: i64,
    pub build_target_id: Uuid,
}

impl BuildKey {
    pub fn new(build_number: i64, build_target_id: Uuid) -> Self {
        Self {
            build_number,
            build_target_id,
        }
    }
}

impl From<&Build> for BuildKey {
    fn from(build: &Build) -> Self {
        Self::new(build.build_number, build.build_target_id)
    }
}
