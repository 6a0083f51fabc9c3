use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use sqlx::types::Json;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbFeature {
    pub id: i64,
    pub name: String,
    pub version: String,
    pub release_date: DateTime<Utc>,
    pub force_upgrade: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbModel {
    pub id: i64,
    pub name: String,
    /// Fixed discriminator label, written by the schema default ("models").
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub version: String,
    pub release_date: DateTime<Utc>,
    pub interface_modified: bool,
    /// Relative download path; empty means the download root.
    pub folder: String,
    pub force_upgrade: bool,
    pub cn_addr: Json<Value>,
    pub foreign_addr: Json<Value>,
    pub oss_addr: Json<Value>,
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbExecutable {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub version: String,
    pub release_date: DateTime<Utc>,
    pub folder: String,
    pub force_upgrade: bool,
    pub oss_addr: Json<Value>,
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbSharedLibrary {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub version: String,
    pub release_date: DateTime<Utc>,
    pub folder: String,
    pub force_upgrade: bool,
    pub oss_addr: Json<Value>,
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbUnpackingRecord {
    pub id: i64,
    pub name: String,
    /// Source artifact type this record was derived from; may be empty.
    pub from_type: String,
    pub from_name: String,
    pub source_path: String,
    pub target_file_name: String,
    pub target_dir: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
