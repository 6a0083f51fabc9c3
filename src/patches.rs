//! Crate-private patch types shared across the DB layer and its callers.
//!
//! The `db` module re-exports these so external paths remain stable
//! (e.g. `vertrack::db::RecordPatch`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::types::Json;

/// Abstraction for applying a patch payload/envelope to the database.
///
/// This is intentionally kept in a neutral crate-private module so the DB
/// actor and higher-level callers can share the same contract.
#[async_trait]
pub trait DbPatchable {
    async fn apply_patch(&self, pool: &SqlitePool) -> Result<(), crate::error::VertrackError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeaturePatch {
    /// `None` => do not change; `Some(v)` => update
    pub name: Option<String>,
    pub version: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub force_upgrade: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelPatch {
    /// `None` => do not change; `Some(v)` => update
    pub name: Option<String>,
    pub version: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub interface_modified: Option<bool>,
    /// `None` => do not change; empty string => download root
    pub folder: Option<String>,
    pub force_upgrade: Option<bool>,
    pub cn_addr: Option<Json<Value>>,
    pub foreign_addr: Option<Json<Value>>,
    pub oss_addr: Option<Json<Value>>,
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutablePatch {
    /// `None` => do not change; `Some(v)` => update
    pub name: Option<String>,
    pub version: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub folder: Option<String>,
    pub force_upgrade: Option<bool>,
    pub oss_addr: Option<Json<Value>>,
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SharedLibraryPatch {
    /// `None` => do not change; `Some(v)` => update
    pub name: Option<String>,
    pub version: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub folder: Option<String>,
    pub force_upgrade: Option<bool>,
    pub oss_addr: Option<Json<Value>>,
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnpackingRecordPatch {
    /// `None` => do not change; `Some(v)` => update
    pub name: Option<String>,
    pub from_type: Option<String>,
    pub from_name: Option<String>,
    pub source_path: Option<String>,
    pub target_file_name: Option<String>,
    pub target_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum RecordPatch {
    Feature { id: u64, patch: FeaturePatch },
    Model { id: u64, patch: ModelPatch },
    Executable { id: u64, patch: ExecutablePatch },
    SharedLibrary { id: u64, patch: SharedLibraryPatch },
    UnpackingRecord { id: u64, patch: UnpackingRecordPatch },
}
