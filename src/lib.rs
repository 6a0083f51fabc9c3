pub mod config;
pub mod db;
pub mod error;

mod patches;

pub use db::{DbActorHandle, FeatureLinks, RecordCreate, RecordPatch};
pub use error::{IsConstraintViolation, VertrackError};
