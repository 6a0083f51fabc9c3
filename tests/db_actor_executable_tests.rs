use serde_json::json;
use sqlx::types::Json;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;
use tokio::fs;
use vertrack::IsConstraintViolation;
use vertrack::db::{ExecutableCreate, ExecutablePatch, RecordCreate, RecordPatch};

#[tokio::test]
async fn test_executable_db_actor_baseline() {
    let tmp_dir = std::env::temp_dir();
    let mut hasher = DefaultHasher::new();
    SystemTime::now().hash(&mut hasher);
    let db_file_name = format!("test_executable_db_{}.sqlite", hasher.finish());
    let db_path = tmp_dir.join(db_file_name);
    let database_url = format!("sqlite:{}", db_path.to_str().unwrap());

    let db_actor_handle = vertrack::db::spawn(&database_url).await;

    let executables = db_actor_handle.list_executables().await.unwrap();
    assert!(executables.is_empty(), "Expected no executables initially");

    let oss_addr = json!({"bucket": "release-bin", "key": "updater.exe"});
    let release_date = chrono::Utc::now();
    let id = db_actor_handle
        .create(RecordCreate::Executable(ExecutableCreate {
            name: "updater".to_string(),
            version: "3.4.1".to_string(),
            release_date,
            folder: String::new(),
            force_upgrade: true,
            oss_addr: Json(oss_addr.clone()),
            size: 18_874_368,
        }))
        .await
        .unwrap();
    assert!(id > 0);

    let exe = db_actor_handle
        .get_executable_by_name("updater")
        .await
        .unwrap();
    assert_eq!(exe.id, id);
    assert_eq!(exe.kind, "exe");
    assert_eq!(exe.version, "3.4.1");
    assert_eq!(exe.release_date, release_date);
    assert_eq!(exe.folder, "", "empty folder denotes the download root");
    assert!(exe.force_upgrade);
    assert_eq!(exe.oss_addr.0, oss_addr);
    assert_eq!(exe.size, 18_874_368);

    // Patch the folder; everything else keeps its value.
    db_actor_handle
        .patch(RecordPatch::Executable {
            id: u64::try_from(id).unwrap(),
            patch: ExecutablePatch {
                folder: Some("tools".to_string()),
                ..Default::default()
            },
        })
        .await
        .unwrap();

    let patched = db_actor_handle
        .get_executable_by_name("updater")
        .await
        .unwrap();
    assert_eq!(patched.folder, "tools");
    assert_eq!(patched.version, "3.4.1");
    assert_eq!(patched.created_at, exe.created_at);
    assert!(patched.updated_at > exe.updated_at);

    let wal_path = std::path::PathBuf::from(format!("{}-wal", db_path.to_string_lossy()));
    let shm_path = std::path::PathBuf::from(format!("{}-shm", db_path.to_string_lossy()));
    let _ = fs::remove_file(&wal_path).await;
    let _ = fs::remove_file(&shm_path).await;
    fs::remove_file(&db_path).await.unwrap();
}

#[tokio::test]
async fn test_executable_duplicate_name_fails() {
    let tmp_dir = std::env::temp_dir();
    let mut hasher = DefaultHasher::new();
    SystemTime::now().hash(&mut hasher);
    let db_file_name = format!("test_executable_dup_db_{}.sqlite", hasher.finish());
    let db_path = tmp_dir.join(db_file_name);
    let database_url = format!("sqlite:{}", db_path.to_str().unwrap());

    let db_actor_handle = vertrack::db::spawn(&database_url).await;

    let create = ExecutableCreate {
        name: "launcher".to_string(),
        version: "1.0.0".to_string(),
        release_date: chrono::Utc::now(),
        folder: String::new(),
        force_upgrade: false,
        oss_addr: Json(json!({"bucket": "release-bin", "key": "launcher.exe"})),
        size: 0,
    };

    db_actor_handle
        .create(RecordCreate::Executable(create.clone()))
        .await
        .unwrap();

    // Same name, different version: still a uniqueness violation.
    let err = db_actor_handle
        .create(RecordCreate::Executable(ExecutableCreate {
            version: "1.0.1".to_string(),
            ..create
        }))
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());
    assert!(!err.is_foreign_key_violation());
    assert!(!err.is_check_violation());

    let executables = db_actor_handle.list_executables().await.unwrap();
    assert_eq!(executables.len(), 1, "failed insert must not add a row");

    let wal_path = std::path::PathBuf::from(format!("{}-wal", db_path.to_string_lossy()));
    let shm_path = std::path::PathBuf::from(format!("{}-shm", db_path.to_string_lossy()));
    let _ = fs::remove_file(&wal_path).await;
    let _ = fs::remove_file(&shm_path).await;
    fs::remove_file(&db_path).await.unwrap();
}
