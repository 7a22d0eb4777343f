//! Adapter tests for the in-memory and filesystem blob stores.

use crate::workspace::adapters::{FsBlobStore, MemoryBlobStore};
use crate::workspace::domain::WorkspaceId;
use crate::workspace::ports::{BlobKey, BlobStore, Collection};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn key() -> BlobKey {
    BlobKey::new(WorkspaceId::new(), Collection::Tasks)
}

#[rstest]
fn storage_key_is_workspace_scoped(key: BlobKey) {
    let flat = key.storage_key();
    assert!(flat.ends_with("::tasks"));
    assert!(flat.starts_with(&key.workspace_id().to_string()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn memory_store_round_trips_a_blob(key: BlobKey) {
    let store = MemoryBlobStore::new();
    let blob = json!([{ "title": "Kickoff" }]);

    assert_eq!(store.read(&key).await.expect("read should succeed"), None);
    store
        .write(&key, &blob)
        .await
        .expect("write should succeed");
    assert_eq!(
        store.read(&key).await.expect("read should succeed"),
        Some(blob)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn memory_store_overwrites_on_rewrite(key: BlobKey) {
    let store = MemoryBlobStore::new();
    store
        .write(&key, &json!(["first"]))
        .await
        .expect("first write should succeed");
    store
        .write(&key, &json!(["second"]))
        .await
        .expect("second write should succeed");

    assert_eq!(
        store.read(&key).await.expect("read should succeed"),
        Some(json!(["second"]))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fs_store_round_trips_a_blob(key: BlobKey) {
    let tmp = tempfile::tempdir().expect("temp dir");
    let dir = Dir::open_ambient_dir(
        tmp.path().to_str().expect("utf8 temp path"),
        ambient_authority(),
    )
    .expect("open temp dir");
    let store = FsBlobStore::new(dir);
    let blob = json!([{ "title": "Persisted" }]);

    assert_eq!(store.read(&key).await.expect("read should succeed"), None);
    store
        .write(&key, &blob)
        .await
        .expect("write should succeed");
    assert_eq!(
        store.read(&key).await.expect("read should succeed"),
        Some(blob)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fs_store_keeps_workspaces_in_separate_files(key: BlobKey) {
    let tmp = tempfile::tempdir().expect("temp dir");
    let dir = Dir::open_ambient_dir(
        tmp.path().to_str().expect("utf8 temp path"),
        ambient_authority(),
    )
    .expect("open temp dir");
    let store = FsBlobStore::new(dir);

    let other = BlobKey::new(WorkspaceId::new(), Collection::Tasks);
    store
        .write(&key, &json!(["mine"]))
        .await
        .expect("write should succeed");

    assert_eq!(store.read(&other).await.expect("read should succeed"), None);
    assert_eq!(
        store.read(&key).await.expect("read should succeed"),
        Some(json!(["mine"]))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fs_store_reports_corrupt_blobs(key: BlobKey) {
    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().to_str().expect("utf8 temp path");
    let dir = Dir::open_ambient_dir(path, ambient_authority()).expect("open temp dir");
    let file_name = format!("{}.tasks.json", key.workspace_id());
    dir.write(&file_name, b"not json").expect("seed corrupt file");

    let store = FsBlobStore::new(dir);
    let result = store.read(&key).await;
    assert!(result.is_err());
}
