//! RecordPatch -> DbPatchable implementation.
//!
//! This sits in the `db` module because it contains SQL/table knowledge.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::VertrackError;
use crate::patches::{
    DbPatchable, ExecutablePatch, FeaturePatch, ModelPatch, RecordPatch, SharedLibraryPatch,
    UnpackingRecordPatch,
};

#[async_trait]
impl DbPatchable for RecordPatch {
    async fn apply_patch(&self, pool: &SqlitePool) -> Result<(), VertrackError> {
        match self {
            RecordPatch::Feature { id, patch } => {
                let id = i64::try_from(*id)
                    .map_err(|_| VertrackError::UnexpectedError(format!("Invalid Feature id {id}")))?;

                let FeaturePatch {
                    name,
                    version,
                    release_date,
                    force_upgrade,
                } = patch.clone();

                let name_set = name.is_some();
                let version_set = version.is_some();
                let release_date_set = release_date.is_some();
                let force_upgrade_set = force_upgrade.is_some();
                let updated_at = Utc::now();

                // Use the non-macro query API so we don't depend on SQLx's offline cache.
                let res = sqlx::query(
                    r#"
                    UPDATE version_feature
                    SET
                        name = COALESCE(?, name),
                        version = COALESCE(?, version),
                        release_date = COALESCE(?, release_date),
                        force_upgrade = COALESCE(?, force_upgrade),
                        updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(name)
                .bind(version)
                .bind(release_date)
                .bind(force_upgrade)
                .bind(updated_at)
                .bind(id)
                .execute(pool)
                .await?;

                let affected = res.rows_affected();
                debug!(
                    record = "feature",
                    id,
                    affected,
                    updated_at = %updated_at,
                    name_set,
                    version_set,
                    release_date_set,
                    force_upgrade_set,
                    "db patch applied"
                );

                if affected == 0 {
                    return Err(VertrackError::RecordNotFound(format!(
                        "Feature not found for id={id}"
                    )));
                }

                Ok(())
            }

            RecordPatch::Model { id, patch } => {
                let id = i64::try_from(*id)
                    .map_err(|_| VertrackError::UnexpectedError(format!("Invalid Model id {id}")))?;

                let ModelPatch {
                    name,
                    version,
                    release_date,
                    interface_modified,
                    folder,
                    force_upgrade,
                    cn_addr,
                    foreign_addr,
                    oss_addr,
                    size,
                } = patch.clone();

                let name_set = name.is_some();
                let version_set = version.is_some();
                let release_date_set = release_date.is_some();
                let interface_modified_set = interface_modified.is_some();
                let folder_set = folder.is_some();
                let force_upgrade_set = force_upgrade.is_some();
                let cn_addr_set = cn_addr.is_some();
                let foreign_addr_set = foreign_addr.is_some();
                let oss_addr_set = oss_addr.is_some();
                let size_set = size.is_some();
                let updated_at = Utc::now();

                let res = sqlx::query(
                    r#"
                    UPDATE version_model
                    SET
                        name = COALESCE(?, name),
                        version = COALESCE(?, version),
                        release_date = COALESCE(?, release_date),
                        interface_modified = COALESCE(?, interface_modified),
                        folder = COALESCE(?, folder),
                        force_upgrade = COALESCE(?, force_upgrade),
                        cn_addr = COALESCE(?, cn_addr),
                        foreign_addr = COALESCE(?, foreign_addr),
                        oss_addr = COALESCE(?, oss_addr),
                        size = COALESCE(?, size),
                        updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(name)
                .bind(version)
                .bind(release_date)
                .bind(interface_modified)
                .bind(folder)
                .bind(force_upgrade)
                .bind(cn_addr)
                .bind(foreign_addr)
                .bind(oss_addr)
                .bind(size)
                .bind(updated_at)
                .bind(id)
                .execute(pool)
                .await?;

                let affected = res.rows_affected();
                debug!(
                    record = "model",
                    id,
                    affected,
                    updated_at = %updated_at,
                    name_set,
                    version_set,
                    release_date_set,
                    interface_modified_set,
                    folder_set,
                    force_upgrade_set,
                    cn_addr_set,
                    foreign_addr_set,
                    oss_addr_set,
                    size_set,
                    "db patch applied"
                );

                if affected == 0 {
                    return Err(VertrackError::RecordNotFound(format!(
                        "Model not found for id={id}"
                    )));
                }

                Ok(())
            }

            RecordPatch::Executable { id, patch } => {
                let id = i64::try_from(*id).map_err(|_| {
                    VertrackError::UnexpectedError(format!("Invalid Executable id {id}"))
                })?;

                let ExecutablePatch {
                    name,
                    version,
                    release_date,
                    folder,
                    force_upgrade,
                    oss_addr,
                    size,
                } = patch.clone();

                let name_set = name.is_some();
                let version_set = version.is_some();
                let release_date_set = release_date.is_some();
                let folder_set = folder.is_some();
                let force_upgrade_set = force_upgrade.is_some();
                let oss_addr_set = oss_addr.is_some();
                let size_set = size.is_some();
                let updated_at = Utc::now();

                let res = sqlx::query(
                    r#"
                    UPDATE version_executable
                    SET
                        name = COALESCE(?, name),
                        version = COALESCE(?, version),
                        release_date = COALESCE(?, release_date),
                        folder = COALESCE(?, folder),
                        force_upgrade = COALESCE(?, force_upgrade),
                        oss_addr = COALESCE(?, oss_addr),
                        size = COALESCE(?, size),
                        updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(name)
                .bind(version)
                .bind(release_date)
                .bind(folder)
                .bind(force_upgrade)
                .bind(oss_addr)
                .bind(size)
                .bind(updated_at)
                .bind(id)
                .execute(pool)
                .await?;

                let affected = res.rows_affected();
                debug!(
                    record = "executable",
                    id,
                    affected,
                    updated_at = %updated_at,
                    name_set,
                    version_set,
                    release_date_set,
                    folder_set,
                    force_upgrade_set,
                    oss_addr_set,
                    size_set,
                    "db patch applied"
                );

                if affected == 0 {
                    return Err(VertrackError::RecordNotFound(format!(
                        "Executable not found for id={id}"
                    )));
                }

                Ok(())
            }

            RecordPatch::SharedLibrary { id, patch } => {
                let id = i64::try_from(*id).map_err(|_| {
                    VertrackError::UnexpectedError(format!("Invalid SharedLibrary id {id}"))
                })?;

                let SharedLibraryPatch {
                    name,
                    version,
                    release_date,
                    folder,
                    force_upgrade,
                    oss_addr,
                    size,
                } = patch.clone();

                let name_set = name.is_some();
                let version_set = version.is_some();
                let release_date_set = release_date.is_some();
                let folder_set = folder.is_some();
                let force_upgrade_set = force_upgrade.is_some();
                let oss_addr_set = oss_addr.is_some();
                let size_set = size.is_some();
                let updated_at = Utc::now();

                let res = sqlx::query(
                    r#"
                    UPDATE version_shared_library
                    SET
                        name = COALESCE(?, name),
                        version = COALESCE(?, version),
                        release_date = COALESCE(?, release_date),
                        folder = COALESCE(?, folder),
                        force_upgrade = COALESCE(?, force_upgrade),
                        oss_addr = COALESCE(?, oss_addr),
                        size = COALESCE(?, size),
                        updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(name)
                .bind(version)
                .bind(release_date)
                .bind(folder)
                .bind(force_upgrade)
                .bind(oss_addr)
                .bind(size)
                .bind(updated_at)
                .bind(id)
                .execute(pool)
                .await?;

                let affected = res.rows_affected();
                debug!(
                    record = "shared_library",
                    id,
                    affected,
                    updated_at = %updated_at,
                    name_set,
                    version_set,
                    release_date_set,
                    folder_set,
                    force_upgrade_set,
                    oss_addr_set,
                    size_set,
                    "db patch applied"
                );

                if affected == 0 {
                    return Err(VertrackError::RecordNotFound(format!(
                        "SharedLibrary not found for id={id}"
                    )));
                }

                Ok(())
            }

            RecordPatch::UnpackingRecord { id, patch } => {
                let id = i64::try_from(*id).map_err(|_| {
                    VertrackError::UnexpectedError(format!("Invalid UnpackingRecord id {id}"))
                })?;

                let UnpackingRecordPatch {
                    name,
                    from_type,
                    from_name,
                    source_path,
                    target_file_name,
                    target_dir,
                } = patch.clone();

                let name_set = name.is_some();
                let from_type_set = from_type.is_some();
                let from_name_set = from_name.is_some();
                let source_path_set = source_path.is_some();
                let target_file_name_set = target_file_name.is_some();
                let target_dir_set = target_dir.is_some();
                let updated_at = Utc::now();

                let res = sqlx::query(
                    r#"
                    UPDATE version_unpacking_record
                    SET
                        name = COALESCE(?, name),
                        from_type = COALESCE(?, from_type),
                        from_name = COALESCE(?, from_name),
                        source_path = COALESCE(?, source_path),
                        target_file_name = COALESCE(?, target_file_name),
                        target_dir = COALESCE(?, target_dir),
                        updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(name)
                .bind(from_type)
                .bind(from_name)
                .bind(source_path)
                .bind(target_file_name)
                .bind(target_dir)
                .bind(updated_at)
                .bind(id)
                .execute(pool)
                .await?;

                let affected = res.rows_affected();
                debug!(
                    record = "unpacking_record",
                    id,
                    affected,
                    updated_at = %updated_at,
                    name_set,
                    from_type_set,
                    from_name_set,
                    source_path_set,
                    target_file_name_set,
                    target_dir_set,
                    "db patch applied"
                );

                if affected == 0 {
                    return Err(VertrackError::RecordNotFound(format!(
                        "UnpackingRecord not found for id={id}"
                    )));
                }

                Ok(())
            }
        }
    }
}
