//! End-to-end relay behaviour over real sockets.

use serde_json::{Value, json};

use termchat_auth::PasswordHasher;

use crate::helpers::{TestApp, TestClient, chat, login, online, register};

#[tokio::test]
async fn test_full_chat_scenario() {
    let app = TestApp::spawn().await;
    let mut alice = app.client().await;
    let mut lurker = app.client().await;

    alice.send(register("alice", "Alice", "pw1")).await;
    assert_eq!(alice.recv().await, json!({"success": true}));
    alice.send(register("alice", "Alice", "pw1")).await;
    assert_eq!(alice.recv().await, json!({"error": "Username exists"}));

    alice.send(login("alice", "pw1")).await;
    assert_eq!(
        alice.recv().await,
        json!({"success": true, "nickname": "Alice"})
    );
    let connected = json!({"type": "system", "data": "Alice|connected"});
    assert_eq!(alice.recv().await, connected);
    assert_eq!(lurker.recv().await, connected);

    lurker.send(chat("anyone?")).await;
    alice.expect_silence().await;
    lurker.expect_silence().await;

    alice.close().await;
    assert_eq!(
        lurker.recv().await,
        json!({"type": "system", "data": "Alice|disconnected"})
    );

    lurker.send(online()).await;
    assert_eq!(
        lurker.recv().await,
        json!({"type": "online_users", "data": []})
    );
}

#[tokio::test]
async fn test_chat_fans_out_to_everyone_but_sender() {
    let app = TestApp::spawn().await;
    let mut alice = app.client().await;
    let mut bob = app.client().await;
    let mut carol = app.client().await;

    alice.send(register("alice", "Alice", "pw1")).await;
    alice.recv().await;
    alice.send(login("alice", "pw1")).await;
    alice.recv().await;
    alice.recv().await;
    bob.recv().await;
    carol.recv().await;

    alice.send(chat("hello | world")).await;
    let expected = json!({"type": "message", "data": "Alice|hello | world"});
    assert_eq!(bob.recv().await, expected);
    assert_eq!(carol.recv().await, expected);
    alice.expect_silence().await;
}

#[tokio::test]
async fn test_wrong_password_closes_connection() {
    let app = TestApp::spawn().await;
    let mut alice = app.client().await;
    alice.send(register("alice", "Alice", "pw1")).await;
    alice.recv().await;

    let mut intruder = app.client().await;
    intruder.send(login("alice", "nope")).await;
    assert_eq!(
        intruder.recv().await,
        json!({"error": "Invalid credentials"})
    );
    intruder.expect_closed().await;

    // The refused login never announced anything.
    alice.expect_silence().await;
}

#[tokio::test]
async fn test_malformed_payload_keeps_connection_usable() {
    let app = TestApp::spawn().await;
    let mut client = app.client().await;

    client.send_raw("{this is not json").await;
    client.expect_silence().await;

    client.send(online()).await;
    assert_eq!(client.recv().await["type"], "online_users");
    assert_eq!(app.engine.metrics().malformed_payloads, 1);
}

/// Sends `get_online_users` and returns the listing, skipping pushes.
async fn online_listing(client: &mut TestClient) -> Value {
    client.send(online()).await;
    loop {
        let frame = client.recv().await;
        if frame["type"] == "online_users" {
            return frame["data"].clone();
        }
    }
}

#[tokio::test]
async fn test_online_users_counts_logins_minus_disconnects() {
    // Every identity starts out persisted as offline.
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("users.json");
    let hash = PasswordHasher::new().hash_password("pw");
    let seeded: serde_json::Map<String, Value> = ["u1", "u2", "u3", "u4"]
        .into_iter()
        .map(|name| {
            let record = json!({"nickname": name.to_uppercase(), "password": hash, "online": false});
            (name.to_string(), record)
        })
        .collect();
    std::fs::write(&path, Value::Object(seeded).to_string()).expect("seed store");

    let app = TestApp::spawn_with(dir, path).await;
    let mut watcher = app.client().await;
    assert_eq!(online_listing(&mut watcher).await, json!([]));

    let mut sessions = Vec::new();
    for name in ["u1", "u2", "u3"] {
        let mut client = app.client().await;
        client.send(login(name, "pw")).await;
        assert_eq!(client.recv().await["success"], true);
        sessions.push(client);
    }
    assert_eq!(online_listing(&mut watcher).await, json!(["U1", "U2", "U3"]));

    let first = sessions.remove(0);
    first.close().await;
    // Wait for the departure to be announced before querying.
    loop {
        let frame = watcher.recv().await;
        if frame == json!({"type": "system", "data": "U1|disconnected"}) {
            break;
        }
    }

    assert_eq!(online_listing(&mut watcher).await, json!(["U2", "U3"]));
}
