//! v001 -- Initial schema creation.
//!
//! Creates the four core tables: `profiles`, `projects`, `build_targets`,
//! and `builds`.  Ownership (profile, project, build target) is enforced
//! with cascading foreign keys; builds reference their target by id but live
//! in their own table keyed by `(build_number, build_target_id)`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Profiles
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS profiles (
    id        TEXT PRIMARY KEY NOT NULL,    -- UUID v4
    name      TEXT NOT NULL,
    api_key   TEXT NOT NULL,                -- remote build service credential
    root_path TEXT NOT NULL                 -- download root directory
);

-- ----------------------------------------------------------------
-- Projects
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS projects (
    id         TEXT PRIMARY KEY NOT NULL,   -- UUID v4, local identity
    profile_id TEXT NOT NULL,               -- FK -> profiles(id)
    cloud_id   TEXT NOT NULL,               -- remote identity
    org_id     TEXT NOT NULL,
    name       TEXT NOT NULL,
    icon_path  TEXT NOT NULL,

    FOREIGN KEY (profile_id) REFERENCES profiles(id) ON DELETE CASCADE,
    UNIQUE (profile_id, cloud_id)           -- reconciliation join key
);

CREATE INDEX IF NOT EXISTS idx_projects_profile_id ON projects(profile_id);

-- ----------------------------------------------------------------
-- Build targets
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS build_targets (
    id         TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    project_id TEXT NOT NULL,               -- FK -> projects(id)
    name       TEXT NOT NULL,
    platform   TEXT NOT NULL,

    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_build_targets_project_id ON build_targets(project_id);

-- ----------------------------------------------------------------
-- Builds
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS builds (
    build_number    INTEGER NOT NULL,       -- per-target number from the service
    build_target_id TEXT NOT NULL,          -- FK -> build_targets(id)
    status          INTEGER NOT NULL,       -- BuildStatus code
    name            TEXT NOT NULL,
    create_time     TEXT NOT NULL,          -- ISO-8601 / RFC-3339
    icon_path       TEXT NOT NULL,
    artifact_name   TEXT NOT NULL,
    artifact_size   INTEGER NOT NULL,       -- bytes
    artifact_path   TEXT,                   -- NULL until downloaded
    manual_download INTEGER NOT NULL DEFAULT 0,  -- boolean 0/1

    PRIMARY KEY (build_number, build_target_id),
    FOREIGN KEY (build_target_id) REFERENCES build_targets(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_builds_target
    ON builds(build_target_id, build_number DESC);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
