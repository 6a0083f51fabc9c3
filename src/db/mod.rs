//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `links.rs`: feature link sets and their join-table SQL
//! - `actor.rs`: the actor owning the pool, and its cloneable handle

pub mod actor;
pub mod links;
pub mod models;
pub mod patch;
pub mod schema;

mod patch_impl;

pub use links::FeatureLinks;
pub use models::{DbExecutable, DbFeature, DbModel, DbSharedLibrary, DbUnpackingRecord};
pub use patch::{
    ExecutableCreate, ExecutablePatch, FeatureCreate, FeaturePatch, ModelCreate, ModelPatch,
    RecordCreate, RecordPatch, SharedLibraryCreate, SharedLibraryPatch, UnpackingRecordCreate,
    UnpackingRecordPatch,
};
pub use schema::SQLITE_INIT;

pub use actor::{DbActorHandle, apply_schema, connect, spawn};
