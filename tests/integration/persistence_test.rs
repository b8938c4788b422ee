//! The credential store survives a restart.

use serde_json::{Value, json};

use termchat_auth::{CredentialStore, JsonFilePersistence};

use crate::helpers::{TestApp, login, register};

#[tokio::test]
async fn test_registration_is_written_and_reloaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("users.json");

    let app = TestApp::spawn_with(dir, path.clone()).await;
    let mut client = app.client().await;
    client.send(register("alice", "Alice", "pw1")).await;
    assert_eq!(client.recv().await, json!({"success": true}));

    let saved: Value =
        serde_json::from_str(&std::fs::read_to_string(&app.store_path).expect("read store"))
            .expect("store json");
    assert_eq!(saved["alice"]["nickname"], "Alice");
    assert_ne!(saved["alice"]["password"], "pw1");
    assert_eq!(saved["alice"]["online"], true);

    // A second relay over the same file accepts the stored credentials.
    let copy = tempfile::tempdir().expect("tempdir");
    let copy_path = copy.path().join("users.json");
    std::fs::copy(&path, &copy_path).expect("copy store");
    let restarted = TestApp::spawn_with(copy, copy_path).await;

    let mut again = restarted.client().await;
    again.send(login("alice", "pw1")).await;
    assert_eq!(
        again.recv().await,
        json!({"success": true, "nickname": "Alice"})
    );
}

#[tokio::test]
async fn test_corrupt_store_refuses_to_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("users.json");
    std::fs::write(&path, "{ not json").expect("write");

    assert!(CredentialStore::load(JsonFilePersistence::new(&path)).is_err());
}
