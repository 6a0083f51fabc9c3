//! Feature link sets: the join-table side of `version_feature`.
//!
//! A feature references zero-or-more models, shared libraries, unpacking
//! records, and executables. Link replacement is all-or-nothing; referential
//! existence is enforced by the foreign keys in the schema.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::VertrackError;

/// The four id sets a feature links to. Ids are ascending when read back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLinks {
    pub model_ids: Vec<i64>,
    pub shared_library_ids: Vec<i64>,
    pub unpacking_record_ids: Vec<i64>,
    pub executable_ids: Vec<i64>,
}

impl FeatureLinks {
    pub fn is_empty(&self) -> bool {
        self.model_ids.is_empty()
            && self.shared_library_ids.is_empty()
            && self.unpacking_record_ids.is_empty()
            && self.executable_ids.is_empty()
    }
}

async fn feature_exists(pool: &SqlitePool, feature_id: i64) -> Result<bool, VertrackError> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM version_feature WHERE id = ?")
        .bind(feature_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// Replace all four link sets of a feature in one transaction.
///
/// Linking a row that does not exist fails with a foreign-key violation and
/// rolls the whole replacement back. Does not touch the feature row itself.
pub(crate) async fn replace_feature_links(
    pool: &SqlitePool,
    feature_id: i64,
    links: &FeatureLinks,
) -> Result<(), VertrackError> {
    if !feature_exists(pool, feature_id).await? {
        return Err(VertrackError::RecordNotFound(format!(
            "Feature not found for id={feature_id}"
        )));
    }

    let mut tx = pool.begin().await?;

    for table in [
        "version_feature_related_models",
        "version_feature_shared_libraries",
        "version_feature_unpacking_records",
        "version_feature_executable",
    ] {
        sqlx::query(&format!("DELETE FROM {table} WHERE feature_id = ?"))
            .bind(feature_id)
            .execute(&mut *tx)
            .await?;
    }

    for &model_id in &links.model_ids {
        sqlx::query(
            "INSERT INTO version_feature_related_models (feature_id, model_id) VALUES (?, ?)",
        )
        .bind(feature_id)
        .bind(model_id)
        .execute(&mut *tx)
        .await?;
    }

    for &shared_library_id in &links.shared_library_ids {
        sqlx::query(
            "INSERT INTO version_feature_shared_libraries (feature_id, shared_library_id) VALUES (?, ?)",
        )
        .bind(feature_id)
        .bind(shared_library_id)
        .execute(&mut *tx)
        .await?;
    }

    for &unpacking_record_id in &links.unpacking_record_ids {
        sqlx::query(
            "INSERT INTO version_feature_unpacking_records (feature_id, unpacking_record_id) VALUES (?, ?)",
        )
        .bind(feature_id)
        .bind(unpacking_record_id)
        .execute(&mut *tx)
        .await?;
    }

    for &executable_id in &links.executable_ids {
        sqlx::query(
            "INSERT INTO version_feature_executable (feature_id, executable_id) VALUES (?, ?)",
        )
        .bind(feature_id)
        .bind(executable_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Read back the four link sets of a feature, each ascending.
pub(crate) async fn fetch_feature_links(
    pool: &SqlitePool,
    feature_id: i64,
) -> Result<FeatureLinks, VertrackError> {
    if !feature_exists(pool, feature_id).await? {
        return Err(VertrackError::RecordNotFound(format!(
            "Feature not found for id={feature_id}"
        )));
    }

    let model_ids = sqlx::query_scalar(
        "SELECT model_id FROM version_feature_related_models WHERE feature_id = ? ORDER BY model_id",
    )
    .bind(feature_id)
    .fetch_all(pool)
    .await?;

    let shared_library_ids = sqlx::query_scalar(
        "SELECT shared_library_id FROM version_feature_shared_libraries WHERE feature_id = ? ORDER BY shared_library_id",
    )
    .bind(feature_id)
    .fetch_all(pool)
    .await?;

    let unpacking_record_ids = sqlx::query_scalar(
        "SELECT unpacking_record_id FROM version_feature_unpacking_records WHERE feature_id = ? ORDER BY unpacking_record_id",
    )
    .bind(feature_id)
    .fetch_all(pool)
    .await?;

    let executable_ids = sqlx::query_scalar(
        "SELECT executable_id FROM version_feature_executable WHERE feature_id = ? ORDER BY executable_id",
    )
    .bind(feature_id)
    .fetch_all(pool)
    .await?;

    Ok(FeatureLinks {
        model_ids,
        shared_library_ids,
        unpacking_record_ids,
        executable_ids,
    })
}
