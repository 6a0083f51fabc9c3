use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;

// Re-export patch payload/envelope types from the neutral crate-private module.
// This keeps `vertrack::db::{RecordPatch, FeaturePatch, ModelPatch}` stable,
// and also preserves `vertrack::db::patch::RecordPatch`.
pub use crate::patches::{
    ExecutablePatch, FeaturePatch, ModelPatch, RecordPatch, SharedLibraryPatch,
    UnpackingRecordPatch,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCreate {
    pub name: String,
    pub version: String,
    pub release_date: DateTime<Utc>,
    pub force_upgrade: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCreate {
    pub name: String,
    pub version: String,
    pub release_date: DateTime<Utc>,
    pub interface_modified: bool,
    /// Empty string means the download root.
    pub folder: String,
    pub force_upgrade: bool,
    pub cn_addr: Json<Value>,
    pub foreign_addr: Json<Value>,
    pub oss_addr: Json<Value>,
    pub size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutableCreate {
    pub name: String,
    pub version: String,
    pub release_date: DateTime<Utc>,
    pub folder: String,
    pub force_upgrade: bool,
    pub oss_addr: Json<Value>,
    pub size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedLibraryCreate {
    pub name: String,
    pub version: String,
    pub release_date: DateTime<Utc>,
    pub folder: String,
    pub force_upgrade: bool,
    pub oss_addr: Json<Value>,
    pub size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnpackingRecordCreate {
    pub name: String,
    /// Source artifact type/name this record was derived from; may be empty.
    pub from_type: String,
    pub from_name: String,
    pub source_path: String,
    pub target_file_name: String,
    pub target_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum RecordCreate {
    Feature(FeatureCreate),
    Model(ModelCreate),
    Executable(ExecutableCreate),
    SharedLibrary(SharedLibraryCreate),
    UnpackingRecord(UnpackingRecordCreate),
}
