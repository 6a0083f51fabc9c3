use serde_json::json;
use sqlx::types::Json;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;
use tokio::fs;
use vertrack::IsConstraintViolation;
use vertrack::db::{ModelCreate, ModelPatch, RecordCreate, RecordPatch};

#[tokio::test]
async fn test_model_db_actor_baseline() {
    let tmp_dir = std::env::temp_dir();
    let mut hasher = DefaultHasher::new();
    SystemTime::now().hash(&mut hasher);
    let db_file_name = format!("test_model_db_{}.sqlite", hasher.finish());
    let db_path = tmp_dir.join(db_file_name);
    let database_url = format!("sqlite:{}", db_path.to_str().unwrap());

    let db_actor_handle = vertrack::db::spawn(&database_url).await;

    let models = db_actor_handle.list_models().await.unwrap();
    assert!(models.is_empty(), "Expected no models initially");

    // Download locations are opaque JSON; the store must round-trip them verbatim.
    let cn_addr = json!({"host": "cdn.cn.example.com", "path": "/models/asr-v5.bin"});
    let foreign_addr = json!({"host": "cdn.example.com", "path": "/models/asr-v5.bin"});
    let oss_addr = json!({"bucket": "release-models", "key": "asr-v5.bin"});

    let release_date = chrono::Utc::now();
    let create_data = ModelCreate {
        name: "asr-v5".to_string(),
        version: "5.1.0".to_string(),
        release_date,
        interface_modified: true,
        folder: "asr".to_string(),
        force_upgrade: false,
        cn_addr: Json(cn_addr.clone()),
        foreign_addr: Json(foreign_addr.clone()),
        oss_addr: Json(oss_addr.clone()),
        size: 734_003_200,
    };

    let id = db_actor_handle
        .create(RecordCreate::Model(create_data))
        .await
        .unwrap();
    assert!(id > 0);

    let model = db_actor_handle.get_model_by_name("asr-v5").await.unwrap();
    assert_eq!(model.id, id);
    assert_eq!(model.kind, "models");
    assert_eq!(model.version, "5.1.0");
    assert_eq!(model.release_date, release_date);
    assert!(model.interface_modified);
    assert_eq!(model.folder, "asr");
    assert!(!model.force_upgrade);
    assert_eq!(model.cn_addr.0, cn_addr);
    assert_eq!(model.foreign_addr.0, foreign_addr);
    assert_eq!(model.oss_addr.0, oss_addr);
    assert_eq!(model.size, 734_003_200);
    assert_eq!(model.created_at, model.updated_at);

    // Patch size only: created_at must stay, updated_at must advance.
    let patch_data = ModelPatch {
        size: Some(734_003_456),
        ..Default::default()
    };
    db_actor_handle
        .patch(RecordPatch::Model {
            id: u64::try_from(id).unwrap(),
            patch: patch_data,
        })
        .await
        .unwrap();

    let patched = db_actor_handle.get_model_by_name("asr-v5").await.unwrap();
    assert_eq!(patched.size, 734_003_456);
    assert_eq!(patched.created_at, model.created_at);
    assert!(patched.updated_at > model.updated_at);
    assert_eq!(patched.cn_addr.0, cn_addr);

    let wal_path = std::path::PathBuf::from(format!("{}-wal", db_path.to_string_lossy()));
    let shm_path = std::path::PathBuf::from(format!("{}-shm", db_path.to_string_lossy()));
    let _ = fs::remove_file(&wal_path).await;
    let _ = fs::remove_file(&shm_path).await;
    fs::remove_file(&db_path).await.unwrap();
}

#[tokio::test]
async fn test_model_rejects_negative_size() {
    let tmp_dir = std::env::temp_dir();
    let mut hasher = DefaultHasher::new();
    SystemTime::now().hash(&mut hasher);
    let db_file_name = format!("test_model_size_db_{}.sqlite", hasher.finish());
    let db_path = tmp_dir.join(db_file_name);
    let database_url = format!("sqlite:{}", db_path.to_str().unwrap());

    let db_actor_handle = vertrack::db::spawn(&database_url).await;

    let create_data = ModelCreate {
        name: "tts-v2".to_string(),
        version: "2.0.0".to_string(),
        release_date: chrono::Utc::now(),
        interface_modified: false,
        folder: String::new(),
        force_upgrade: false,
        cn_addr: Json(json!(null)),
        foreign_addr: Json(json!(null)),
        oss_addr: Json(json!(null)),
        size: -1,
    };

    let err = db_actor_handle
        .create(RecordCreate::Model(create_data.clone()))
        .await
        .unwrap_err();
    assert!(err.is_check_violation(), "negative size must be rejected");

    // A valid create followed by a negative-size patch is rejected the same way.
    let id = db_actor_handle
        .create(RecordCreate::Model(ModelCreate {
            size: 0,
            ..create_data
        }))
        .await
        .unwrap();

    let err = db_actor_handle
        .patch(RecordPatch::Model {
            id: u64::try_from(id).unwrap(),
            patch: ModelPatch {
                size: Some(-5),
                ..Default::default()
            },
        })
        .await
        .unwrap_err();
    assert!(err.is_check_violation());

    let model = db_actor_handle.get_model_by_name("tts-v2").await.unwrap();
    assert_eq!(model.size, 0, "rejected patch must not change the row");

    let wal_path = std::path::PathBuf::from(format!("{}-wal", db_path.to_string_lossy()));
    let shm_path = std::path::PathBuf::from(format!("{}-shm", db_path.to_string_lossy()));
    let _ = fs::remove_file(&wal_path).await;
    let _ = fs::remove_file(&shm_path).await;
    fs::remove_file(&db_path).await.unwrap();
}
