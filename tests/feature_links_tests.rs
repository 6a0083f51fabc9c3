use serde_json::json;
use sqlx::types::Json;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;
use tokio::fs;
use vertrack::IsConstraintViolation;
use vertrack::db::{
    ExecutableCreate, FeatureCreate, FeatureLinks, ModelCreate, RecordCreate,
    SharedLibraryCreate, UnpackingRecordCreate,
};

fn model_create(name: &str) -> ModelCreate {
    ModelCreate {
        name: name.to_string(),
        version: "1.0.0".to_string(),
        release_date: chrono::Utc::now(),
        interface_modified: false,
        folder: String::new(),
        force_upgrade: false,
        cn_addr: Json(json!({"host": "cdn.cn.example.com"})),
        foreign_addr: Json(json!({"host": "cdn.example.com"})),
        oss_addr: Json(json!({"bucket": "release-models"})),
        size: 1024,
    }
}

#[tokio::test]
async fn test_feature_links_set_read_replace() {
    let tmp_dir = std::env::temp_dir();
    let mut hasher = DefaultHasher::new();
    SystemTime::now().hash(&mut hasher);
    let db_file_name = format!("test_feature_links_db_{}.sqlite", hasher.finish());
    let db_path = tmp_dir.join(db_file_name);
    let database_url = format!("sqlite:{}", db_path.to_str().unwrap());

    let db_actor_handle = vertrack::db::spawn(&database_url).await;

    let feature_id = db_actor_handle
        .create(RecordCreate::Feature(FeatureCreate {
            name: "voice-input".to_string(),
            version: "2.1.0".to_string(),
            release_date: chrono::Utc::now(),
            force_upgrade: false,
        }))
        .await
        .unwrap();

    let model_a = db_actor_handle
        .create(RecordCreate::Model(model_create("asr-v5")))
        .await
        .unwrap();
    let model_b = db_actor_handle
        .create(RecordCreate::Model(model_create("punct-v1")))
        .await
        .unwrap();

    let library_id = db_actor_handle
        .create(RecordCreate::SharedLibrary(SharedLibraryCreate {
            name: "libaudio".to_string(),
            version: "0.8.2".to_string(),
            release_date: chrono::Utc::now(),
            folder: "lib".to_string(),
            force_upgrade: false,
            oss_addr: Json(json!({"bucket": "release-lib"})),
            size: 2048,
        }))
        .await
        .unwrap();

    let executable_id = db_actor_handle
        .create(RecordCreate::Executable(ExecutableCreate {
            name: "updater".to_string(),
            version: "3.4.1".to_string(),
            release_date: chrono::Utc::now(),
            folder: String::new(),
            force_upgrade: false,
            oss_addr: Json(json!({"bucket": "release-bin"})),
            size: 4096,
        }))
        .await
        .unwrap();

    let record_id = db_actor_handle
        .create(RecordCreate::UnpackingRecord(UnpackingRecordCreate {
            name: "asr-v5-unpack".to_string(),
            from_type: "models".to_string(),
            from_name: "asr-v5".to_string(),
            source_path: "downloads/asr-v5.tar.gz".to_string(),
            target_file_name: "asr-v5.bin".to_string(),
            target_dir: "models/asr".to_string(),
        }))
        .await
        .unwrap();

    let feature_before = db_actor_handle
        .get_feature_by_name("voice-input")
        .await
        .unwrap();

    // Set all four link sets at once.
    db_actor_handle
        .set_feature_links(
            feature_id,
            FeatureLinks {
                model_ids: vec![model_b, model_a],
                shared_library_ids: vec![library_id],
                unpacking_record_ids: vec![record_id],
                executable_ids: vec![executable_id],
            },
        )
        .await
        .unwrap();

    let links = db_actor_handle.feature_links(feature_id).await.unwrap();
    assert_eq!(links.model_ids, vec![model_a, model_b], "ids read back ascending");
    assert_eq!(links.shared_library_ids, vec![library_id]);
    assert_eq!(links.unpacking_record_ids, vec![record_id]);
    assert_eq!(links.executable_ids, vec![executable_id]);

    // Link changes bypass the row save path: updated_at is untouched.
    let feature_after = db_actor_handle
        .get_feature_by_name("voice-input")
        .await
        .unwrap();
    assert_eq!(feature_after.updated_at, feature_before.updated_at);

    // Replacement is wholesale, not additive.
    db_actor_handle
        .set_feature_links(
            feature_id,
            FeatureLinks {
                model_ids: vec![model_a],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let links = db_actor_handle.feature_links(feature_id).await.unwrap();
    assert_eq!(links.model_ids, vec![model_a]);
    assert!(links.shared_library_ids.is_empty());
    assert!(links.unpacking_record_ids.is_empty());
    assert!(links.executable_ids.is_empty());

    let wal_path = std::path::PathBuf::from(format!("{}-wal", db_path.to_string_lossy()));
    let shm_path = std::path::PathBuf::from(format!("{}-shm", db_path.to_string_lossy()));
    let _ = fs::remove_file(&wal_path).await;
    let _ = fs::remove_file(&shm_path).await;
    fs::remove_file(&db_path).await.unwrap();
}

#[tokio::test]
async fn test_feature_links_require_existing_rows() {
    let tmp_dir = std::env::temp_dir();
    let mut hasher = DefaultHasher::new();
    SystemTime::now().hash(&mut hasher);
    let db_file_name = format!("test_feature_links_fk_db_{}.sqlite", hasher.finish());
    let db_path = tmp_dir.join(db_file_name);
    let database_url = format!("sqlite:{}", db_path.to_str().unwrap());

    let db_actor_handle = vertrack::db::spawn(&database_url).await;

    let feature_id = db_actor_handle
        .create(RecordCreate::Feature(FeatureCreate {
            name: "screen-share".to_string(),
            version: "1.0.0".to_string(),
            release_date: chrono::Utc::now(),
            force_upgrade: false,
        }))
        .await
        .unwrap();

    let model_id = db_actor_handle
        .create(RecordCreate::Model(model_create("vision-v1")))
        .await
        .unwrap();

    db_actor_handle
        .set_feature_links(
            feature_id,
            FeatureLinks {
                model_ids: vec![model_id],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Linking a nonexistent model fails and rolls the replacement back.
    let err = db_actor_handle
        .set_feature_links(
            feature_id,
            FeatureLinks {
                model_ids: vec![model_id, 9999],
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_foreign_key_violation());

    let links = db_actor_handle.feature_links(feature_id).await.unwrap();
    assert_eq!(links.model_ids, vec![model_id], "failed replacement must roll back");

    // Link operations against an unknown feature are errors, not no-ops.
    let err = db_actor_handle
        .set_feature_links(9999, FeatureLinks::default())
        .await
        .unwrap_err();
    assert!(matches!(err, vertrack::VertrackError::RecordNotFound(_)));

    let err = db_actor_handle.feature_links(9999).await.unwrap_err();
    assert!(matches!(err, vertrack::VertrackError::RecordNotFound(_)));

    let wal_path = std::path::PathBuf::from(format!("{}-wal", db_path.to_string_lossy()));
    let shm_path = std::path::PathBuf::from(format!("{}-shm", db_path.to_string_lossy()));
    let _ = fs::remove_file(&wal_path).await;
    let _ = fs::remove_file(&shm_path).await;
    fs::remove_file(&db_path).await.unwrap();
}
