//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `version_feature` table (one product feature per row)
/// - `version_model` table (model artifacts, one unique name per row)
/// - `version_executable` table (executable artifacts)
/// - `version_shared_library` table (shared-library artifacts)
/// - `version_unpacking_record` table (unpack-operation records)
/// - four join tables linking features to the other record kinds
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Features (one unique name per row)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS version_feature (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    version TEXT NOT NULL,
    release_date TEXT NOT NULL, -- RFC3339
    force_upgrade INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_version_feature_release_date
    ON version_feature(release_date);

-- ---------------------------------------------------------------------------
-- Model artifacts
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS version_model (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    type TEXT NOT NULL DEFAULT 'models',
    version TEXT NOT NULL,
    release_date TEXT NOT NULL, -- RFC3339
    interface_modified INTEGER NOT NULL DEFAULT 0,
    folder TEXT NOT NULL DEFAULT '', -- empty means the download root
    force_upgrade INTEGER NOT NULL DEFAULT 0,
    cn_addr TEXT NOT NULL, -- JSON
    foreign_addr TEXT NOT NULL, -- JSON
    oss_addr TEXT NOT NULL, -- JSON
    size INTEGER NOT NULL DEFAULT 0 CHECK (size >= 0), -- bytes
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_version_model_release_date
    ON version_model(release_date);

-- ---------------------------------------------------------------------------
-- Executable artifacts
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS version_executable (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    type TEXT NOT NULL DEFAULT 'exe',
    version TEXT NOT NULL,
    release_date TEXT NOT NULL, -- RFC3339
    folder TEXT NOT NULL DEFAULT '', -- empty means the download root
    force_upgrade INTEGER NOT NULL DEFAULT 0,
    oss_addr TEXT NOT NULL, -- JSON
    size INTEGER NOT NULL DEFAULT 0 CHECK (size >= 0), -- bytes
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_version_executable_release_date
    ON version_executable(release_date);

-- ---------------------------------------------------------------------------
-- Shared-library artifacts
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS version_shared_library (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    type TEXT NOT NULL DEFAULT 'sharelib',
    version TEXT NOT NULL,
    release_date TEXT NOT NULL, -- RFC3339
    folder TEXT NOT NULL DEFAULT '', -- empty means the download root
    force_upgrade INTEGER NOT NULL DEFAULT 0,
    oss_addr TEXT NOT NULL, -- JSON
    size INTEGER NOT NULL DEFAULT 0 CHECK (size >= 0), -- bytes
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_version_shared_library_release_date
    ON version_shared_library(release_date);

-- ---------------------------------------------------------------------------
-- Unpack-operation records
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS version_unpacking_record (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    from_type TEXT NOT NULL DEFAULT '',
    from_name TEXT NOT NULL DEFAULT '',
    source_path TEXT NOT NULL,
    target_file_name TEXT NOT NULL DEFAULT '',
    target_dir TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

-- ---------------------------------------------------------------------------
-- Feature link tables (one (feature, target) pair per row)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS version_feature_related_models (
    id INTEGER PRIMARY KEY NOT NULL,
    feature_id INTEGER NOT NULL REFERENCES version_feature(id),
    model_id INTEGER NOT NULL REFERENCES version_model(id),
    UNIQUE(feature_id, model_id)
);

CREATE INDEX IF NOT EXISTS idx_version_feature_related_models_feature
    ON version_feature_related_models(feature_id);

CREATE TABLE IF NOT EXISTS version_feature_shared_libraries (
    id INTEGER PRIMARY KEY NOT NULL,
    feature_id INTEGER NOT NULL REFERENCES version_feature(id),
    shared_library_id INTEGER NOT NULL REFERENCES version_shared_library(id),
    UNIQUE(feature_id, shared_library_id)
);

CREATE INDEX IF NOT EXISTS idx_version_feature_shared_libraries_feature
    ON version_feature_shared_libraries(feature_id);

CREATE TABLE IF NOT EXISTS version_feature_unpacking_records (
    id INTEGER PRIMARY KEY NOT NULL,
    feature_id INTEGER NOT NULL REFERENCES version_feature(id),
    unpacking_record_id INTEGER NOT NULL REFERENCES version_unpacking_record(id),
    UNIQUE(feature_id, unpacking_record_id)
);

CREATE INDEX IF NOT EXISTS idx_version_feature_unpacking_records_feature
    ON version_feature_unpacking_records(feature_id);

CREATE TABLE IF NOT EXISTS version_feature_executable (
    id INTEGER PRIMARY KEY NOT NULL,
    feature_id INTEGER NOT NULL REFERENCES version_feature(id),
    executable_id INTEGER NOT NULL REFERENCES version_executable(id),
    UNIQUE(feature_id, executable_id)
);

CREATE INDEX IF NOT EXISTS idx_version_feature_executable_feature
    ON version_feature_executable(feature_id);
"#;
