use crate::db::links::{self, FeatureLinks};
use crate::db::models::{
    DbExecutable, DbFeature, DbModel, DbSharedLibrary, DbUnpackingRecord,
};
use crate::db::patch::RecordCreate;
use crate::db::schema::SQLITE_INIT;
use crate::error::VertrackError;
use crate::patches::{DbPatchable, RecordPatch};
use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::info;

#[derive(Debug)]
pub enum DbActorMessage {
    /// Create a record and return its id. Duplicate names fail.
    Create(RecordCreate, RpcReplyPort<Result<i64, VertrackError>>),

    /// Patch a record by id.
    Patch(RecordPatch, RpcReplyPort<Result<(), VertrackError>>),

    /// List features, newest release first.
    ListFeatures(RpcReplyPort<Result<Vec<DbFeature>, VertrackError>>),

    /// List model artifacts, newest release first.
    ListModels(RpcReplyPort<Result<Vec<DbModel>, VertrackError>>),

    /// List executable artifacts, newest release first.
    ListExecutables(RpcReplyPort<Result<Vec<DbExecutable>, VertrackError>>),

    /// List shared-library artifacts, newest release first.
    ListSharedLibraries(RpcReplyPort<Result<Vec<DbSharedLibrary>, VertrackError>>),

    /// List unpacking records in id order.
    ListUnpackingRecords(RpcReplyPort<Result<Vec<DbUnpackingRecord>, VertrackError>>),

    /// Get a feature by its unique name.
    GetFeatureByName(String, RpcReplyPort<Result<DbFeature, VertrackError>>),

    /// Get a model artifact by its unique name.
    GetModelByName(String, RpcReplyPort<Result<DbModel, VertrackError>>),

    /// Get an executable artifact by its unique name.
    GetExecutableByName(String, RpcReplyPort<Result<DbExecutable, VertrackError>>),

    /// Get a shared-library artifact by its unique name.
    GetSharedLibraryByName(String, RpcReplyPort<Result<DbSharedLibrary, VertrackError>>),

    /// Get an unpacking record by its unique name.
    GetUnpackingRecordByName(String, RpcReplyPort<Result<DbUnpackingRecord, VertrackError>>),

    /// Replace a feature's four link sets in one transaction.
    SetFeatureLinks(i64, FeatureLinks, RpcReplyPort<Result<(), VertrackError>>),

    /// Read back a feature's four link sets.
    GetFeatureLinks(i64, RpcReplyPort<Result<FeatureLinks, VertrackError>>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn create(&self, create: RecordCreate) -> Result<i64, VertrackError> {
        ractor::call!(self.actor, DbActorMessage::Create, create)
            .map_err(|e| VertrackError::RactorError(format!("DbActor Create RPC failed: {e}")))?
    }

    pub async fn patch(&self, patch: RecordPatch) -> Result<(), VertrackError> {
        ractor::call!(self.actor, DbActorMessage::Patch, patch)
            .map_err(|e| VertrackError::RactorError(format!("DbActor Patch RPC failed: {e}")))?
    }

    pub async fn list_features(&self) -> Result<Vec<DbFeature>, VertrackError> {
        ractor::call!(self.actor, DbActorMessage::ListFeatures).map_err(|e| {
            VertrackError::RactorError(format!("DbActor ListFeatures RPC failed: {e}"))
        })?
    }

    pub async fn list_models(&self) -> Result<Vec<DbModel>, VertrackError> {
        ractor::call!(self.actor, DbActorMessage::ListModels)
            .map_err(|e| VertrackError::RactorError(format!("DbActor ListModels RPC failed: {e}")))?
    }

    pub async fn list_executables(&self) -> Result<Vec<DbExecutable>, VertrackError> {
        ractor::call!(self.actor, DbActorMessage::ListExecutables).map_err(|e| {
            VertrackError::RactorError(format!("DbActor ListExecutables RPC failed: {e}"))
        })?
    }

    pub async fn list_shared_libraries(&self) -> Result<Vec<DbSharedLibrary>, VertrackError> {
        ractor::call!(self.actor, DbActorMessage::ListSharedLibraries).map_err(|e| {
            VertrackError::RactorError(format!("DbActor ListSharedLibraries RPC failed: {e}"))
        })?
    }

    pub async fn list_unpacking_records(&self) -> Result<Vec<DbUnpackingRecord>, VertrackError> {
        ractor::call!(self.actor, DbActorMessage::ListUnpackingRecords).map_err(|e| {
            VertrackError::RactorError(format!("DbActor ListUnpackingRecords RPC failed: {e}"))
        })?
    }

    pub async fn get_feature_by_name(&self, name: &str) -> Result<DbFeature, VertrackError> {
        ractor::call!(self.actor, DbActorMessage::GetFeatureByName, name.to_string()).map_err(
            |e| VertrackError::RactorError(format!("DbActor GetFeatureByName RPC failed: {e}")),
        )?
    }

    pub async fn get_model_by_name(&self, name: &str) -> Result<DbModel, VertrackError> {
        ractor::call!(self.actor, DbActorMessage::GetModelByName, name.to_string()).map_err(|e| {
            VertrackError::RactorError(format!("DbActor GetModelByName RPC failed: {e}"))
        })?
    }

    pub async fn get_executable_by_name(&self, name: &str) -> Result<DbExecutable, VertrackError> {
        ractor::call!(self.actor, DbActorMessage::GetExecutableByName, name.to_string()).map_err(
            |e| VertrackError::RactorError(format!("DbActor GetExecutableByName RPC failed: {e}")),
        )?
    }

    pub async fn get_shared_library_by_name(
        &self,
        name: &str,
    ) -> Result<DbSharedLibrary, VertrackError> {
        ractor::call!(self.actor, DbActorMessage::GetSharedLibraryByName, name.to_string())
            .map_err(|e| {
                VertrackError::RactorError(format!("DbActor GetSharedLibraryByName RPC failed: {e}"))
            })?
    }

    pub async fn get_unpacking_record_by_name(
        &self,
        name: &str,
    ) -> Result<DbUnpackingRecord, VertrackError> {
        ractor::call!(self.actor, DbActorMessage::GetUnpackingRecordByName, name.to_string())
            .map_err(|e| {
                VertrackError::RactorError(format!(
                    "DbActor GetUnpackingRecordByName RPC failed: {e}"
                ))
            })?
    }

    pub async fn set_feature_links(
        &self,
        feature_id: i64,
        links: FeatureLinks,
    ) -> Result<(), VertrackError> {
        ractor::call!(self.actor, DbActorMessage::SetFeatureLinks, feature_id, links).map_err(
            |e| VertrackError::RactorError(format!("DbActor SetFeatureLinks RPC failed: {e}")),
        )?
    }

    pub async fn feature_links(&self, feature_id: i64) -> Result<FeatureLinks, VertrackError> {
        ractor::call!(self.actor, DbActorMessage::GetFeatureLinks, feature_id).map_err(|e| {
            VertrackError::RactorError(format!("DbActor GetFeatureLinks RPC failed: {e}"))
        })?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let pool = connect(&database_url)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::Create(create, reply) => {
                let res = self.create_record(&state.pool, create).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Patch(patch, reply) => {
                let res = patch.apply_patch(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ListFeatures(reply) => {
                let res = self.list_features(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ListModels(reply) => {
                let res = self.list_models(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ListExecutables(reply) => {
                let res = self.list_executables(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ListSharedLibraries(reply) => {
                let res = self.list_shared_libraries(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ListUnpackingRecords(reply) => {
                let res = self.list_unpacking_records(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::GetFeatureByName(name, reply) => {
                let res = self.get_feature_by_name(&state.pool, &name).await;
                let _ = reply.send(res);
            }
            DbActorMessage::GetModelByName(name, reply) => {
                let res = self.get_model_by_name(&state.pool, &name).await;
                let _ = reply.send(res);
            }
            DbActorMessage::GetExecutableByName(name, reply) => {
                let res = self.get_executable_by_name(&state.pool, &name).await;
                let _ = reply.send(res);
            }
            DbActorMessage::GetSharedLibraryByName(name, reply) => {
                let res = self.get_shared_library_by_name(&state.pool, &name).await;
                let _ = reply.send(res);
            }
            DbActorMessage::GetUnpackingRecordByName(name, reply) => {
                let res = self.get_unpacking_record_by_name(&state.pool, &name).await;
                let _ = reply.send(res);
            }
            DbActorMessage::SetFeatureLinks(feature_id, feature_links, reply) => {
                let res = links::replace_feature_links(&state.pool, feature_id, &feature_links).await;
                let _ = reply.send(res);
            }
            DbActorMessage::GetFeatureLinks(feature_id, reply) => {
                let res = links::fetch_feature_links(&state.pool, feature_id).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn create_record(
        &self,
        pool: &SqlitePool,
        create: RecordCreate,
    ) -> Result<i64, VertrackError> {
        match create {
            RecordCreate::Feature(c) => {
                let now = Utc::now();
                let id: i64 = sqlx::query_scalar(
                    r#"
                INSERT INTO version_feature (
                    name, version, release_date, force_upgrade, created_at, updated_at
                )
                VALUES (?, ?, ?, ?, ?, ?)
                RETURNING id
                "#,
                )
                .bind(c.name)
                .bind(c.version)
                .bind(c.release_date)
                .bind(c.force_upgrade)
                .bind(now)
                .bind(now)
                .fetch_one(pool)
                .await?;

                Ok(id)
            }

            RecordCreate::Model(c) => {
                let now = Utc::now();
                let id: i64 = sqlx::query_scalar(
                    r#"
                INSERT INTO version_model (
                    name, version, release_date, interface_modified, folder, force_upgrade,
                    cn_addr, foreign_addr, oss_addr, size, created_at, updated_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING id
                "#,
                )
                .bind(c.name)
                .bind(c.version)
                .bind(c.release_date)
                .bind(c.interface_modified)
                .bind(c.folder)
                .bind(c.force_upgrade)
                .bind(c.cn_addr)
                .bind(c.foreign_addr)
                .bind(c.oss_addr)
                .bind(c.size)
                .bind(now)
                .bind(now)
                .fetch_one(pool)
                .await?;

                Ok(id)
            }

            RecordCreate::Executable(c) => {
                let now = Utc::now();
                let id: i64 = sqlx::query_scalar(
                    r#"
                INSERT INTO version_executable (
                    name, version, release_date, folder, force_upgrade, oss_addr, size,
                    created_at, updated_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING id
                "#,
                )
                .bind(c.name)
                .bind(c.version)
                .bind(c.release_date)
                .bind(c.folder)
                .bind(c.force_upgrade)
                .bind(c.oss_addr)
                .bind(c.size)
                .bind(now)
                .bind(now)
                .fetch_one(pool)
                .await?;

                Ok(id)
            }

            RecordCreate::SharedLibrary(c) => {
                let now = Utc::now();
                let id: i64 = sqlx::query_scalar(
                    r#"
                INSERT INTO version_shared_library (
                    name, version, release_date, folder, force_upgrade, oss_addr, size,
                    created_at, updated_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING id
                "#,
                )
                .bind(c.name)
                .bind(c.version)
                .bind(c.release_date)
                .bind(c.folder)
                .bind(c.force_upgrade)
                .bind(c.oss_addr)
                .bind(c.size)
                .bind(now)
                .bind(now)
                .fetch_one(pool)
                .await?;

                Ok(id)
            }

            RecordCreate::UnpackingRecord(c) => {
                let now = Utc::now();
                let id: i64 = sqlx::query_scalar(
                    r#"
                INSERT INTO version_unpacking_record (
                    name, from_type, from_name, source_path, target_file_name, target_dir,
                    created_at, updated_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING id
                "#,
                )
                .bind(c.name)
                .bind(c.from_type)
                .bind(c.from_name)
                .bind(c.source_path)
                .bind(c.target_file_name)
                .bind(c.target_dir)
                .bind(now)
                .bind(now)
                .fetch_one(pool)
                .await?;

                Ok(id)
            }
        }
    }

    async fn list_features(&self, pool: &SqlitePool) -> Result<Vec<DbFeature>, VertrackError> {
        let rows = sqlx::query_as::<_, DbFeature>(
            r#"
        SELECT id, name, version, release_date, force_upgrade, created_at, updated_at
        FROM version_feature
        ORDER BY release_date DESC
        "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn list_models(&self, pool: &SqlitePool) -> Result<Vec<DbModel>, VertrackError> {
        let rows = sqlx::query_as::<_, DbModel>(
            r#"
        SELECT id, name, type, version, release_date, interface_modified, folder, force_upgrade,
               cn_addr, foreign_addr, oss_addr, size, created_at, updated_at
        FROM version_model
        ORDER BY release_date DESC
        "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn list_executables(
        &self,
        pool: &SqlitePool,
    ) -> Result<Vec<DbExecutable>, VertrackError> {
        let rows = sqlx::query_as::<_, DbExecutable>(
            r#"
        SELECT id, name, type, version, release_date, folder, force_upgrade, oss_addr, size,
               created_at, updated_at
        FROM version_executable
        ORDER BY release_date DESC
        "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn list_shared_libraries(
        &self,
        pool: &SqlitePool,
    ) -> Result<Vec<DbSharedLibrary>, VertrackError> {
        let rows = sqlx::query_as::<_, DbSharedLibrary>(
            r#"
        SELECT id, name, type, version, release_date, folder, force_upgrade, oss_addr, size,
               created_at, updated_at
        FROM version_shared_library
        ORDER BY release_date DESC
        "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn list_unpacking_records(
        &self,
        pool: &SqlitePool,
    ) -> Result<Vec<DbUnpackingRecord>, VertrackError> {
        let rows = sqlx::query_as::<_, DbUnpackingRecord>(
            r#"
        SELECT id, name, from_type, from_name, source_path, target_file_name, target_dir,
               created_at, updated_at
        FROM version_unpacking_record
        ORDER BY id
        "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn get_feature_by_name(
        &self,
        pool: &SqlitePool,
        name: &str,
    ) -> Result<DbFeature, VertrackError> {
        let row = sqlx::query_as::<_, DbFeature>(
            r#"
        SELECT id, name, version, release_date, force_upgrade, created_at, updated_at
        FROM version_feature
        WHERE name = ?
        "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    async fn get_model_by_name(
        &self,
        pool: &SqlitePool,
        name: &str,
    ) -> Result<DbModel, VertrackError> {
        let row = sqlx::query_as::<_, DbModel>(
            r#"
        SELECT id, name, type, version, release_date, interface_modified, folder, force_upgrade,
               cn_addr, foreign_addr, oss_addr, size, created_at, updated_at
        FROM version_model
        WHERE name = ?
        "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    async fn get_executable_by_name(
        &self,
        pool: &SqlitePool,
        name: &str,
    ) -> Result<DbExecutable, VertrackError> {
        let row = sqlx::query_as::<_, DbExecutable>(
            r#"
        SELECT id, name, type, version, release_date, folder, force_upgrade, oss_addr, size,
               created_at, updated_at
        FROM version_executable
        WHERE name = ?
        "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    async fn get_shared_library_by_name(
        &self,
        pool: &SqlitePool,
        name: &str,
    ) -> Result<DbSharedLibrary, VertrackError> {
        let row = sqlx::query_as::<_, DbSharedLibrary>(
            r#"
        SELECT id, name, type, version, release_date, folder, force_upgrade, oss_addr, size,
               created_at, updated_at
        FROM version_shared_library
        WHERE name = ?
        "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    async fn get_unpacking_record_by_name(
        &self,
        pool: &SqlitePool,
        name: &str,
    ) -> Result<DbUnpackingRecord, VertrackError> {
        let row = sqlx::query_as::<_, DbUnpackingRecord>(
            r#"
        SELECT id, name, from_type, from_name, source_path, target_file_name, target_dir,
               created_at, updated_at
        FROM version_unpacking_record
        WHERE name = ?
        "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}

/// Open a pooled SQLite connection with the store's standing options.
///
/// Foreign keys are enabled on every connection; feature links rely on it.
pub async fn connect(database_url: &str) -> Result<SqlitePool, VertrackError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    Ok(pool)
}

/// Apply the schema DDL statement by statement.
pub async fn apply_schema(pool: &SqlitePool) -> Result<(), VertrackError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn(database_url: &str) -> DbActorHandle {
    let (actor, _jh) = ractor::Actor::spawn(
        Some("DbActor".to_string()),
        DbActor,
        database_url.to_string(),
    )
    .await
    .expect("failed to spawn DbActor");

    DbActorHandle { actor }
}
