//! Shared test helpers for integration tests.

use std::path::PathBuf;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use termchat_api::{RelayState, relay_router};
use termchat_auth::{CredentialStore, JsonFilePersistence};
use termchat_core::config::RealtimeConfig;
use termchat_realtime::RelayEngine;

/// How long to wait for a frame that should arrive.
const RECV_TIMEOUT: Duration = Duration::from_secs(3);
/// How long to listen before concluding nothing is coming.
const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// A relay served on an ephemeral port with a store in a temp directory.
pub struct TestApp {
    /// `ws://127.0.0.1:<port>/`
    pub url: String,
    /// Engine front door.
    pub engine: RelayEngine,
    /// Path of the credential store file.
    pub store_path: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    /// Start a relay over an empty store.
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let store_path = dir.path().join("users.json");
        Self::spawn_with(dir, store_path).await
    }

    /// Start a relay over whatever is at `store_path`.
    pub async fn spawn_with(dir: TempDir, store_path: PathBuf) -> Self {
        let store =
            CredentialStore::load(JsonFilePersistence::new(&store_path)).expect("load store");
        let (engine, _task) = RelayEngine::spawn(store, &RealtimeConfig::default());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let app = relay_router(RelayState::new(engine.clone()));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            url: format!("ws://{addr}/"),
            engine,
            store_path,
            _dir: dir,
        }
    }

    /// Connect a client that the engine has already registered.
    pub async fn client(&self) -> TestClient {
        TestClient::connect(&self.url).await
    }
}

/// One WebSocket client.
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Connect and wait until the engine answers, so the connection is
    /// registered before the test continues.
    pub async fn connect(url: &str) -> Self {
        let (ws, _) = connect_async(url).await.expect("connect");
        let mut client = Self { ws };
        client.send(json!({"action": "get_online_users"})).await;
        let reply = client.recv().await;
        assert_eq!(reply["type"], "online_users", "unexpected first frame: {reply}");
        client
    }

    /// Send a JSON frame.
    pub async fn send(&mut self, frame: Value) {
        self.send_raw(&frame.to_string()).await;
    }

    /// Send an arbitrary text frame.
    pub async fn send_raw(&mut self, text: &str) {
        self.ws
            .send(Message::text(text.to_string()))
            .await
            .expect("send");
    }

    /// Next JSON frame; panics if none arrives in time.
    pub async fn recv(&mut self) -> Value {
        match self.next_text(RECV_TIMEOUT).await {
            Some(text) => serde_json::from_str(&text).expect("json frame"),
            None => panic!("no frame received"),
        }
    }

    /// Asserts no text frame arrives within the quiet period.
    pub async fn expect_silence(&mut self) {
        if let Some(text) = self.next_text(QUIET_PERIOD).await {
            panic!("expected silence, got {text}");
        }
    }

    /// Asserts the server closes the connection.
    pub async fn expect_closed(&mut self) {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            match timeout(remaining, self.ws.next()).await {
                Ok(Some(Ok(Message::Close(_)))) | Ok(None) | Ok(Some(Err(_))) => return,
                Ok(Some(Ok(Message::Text(text)))) => panic!("expected close, got {text}"),
                Ok(Some(Ok(_))) => continue,
                Err(_) => panic!("connection was not closed"),
            }
        }
    }

    /// Closes the client side.
    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }

    async fn next_text(&mut self, wait: Duration) -> Option<String> {
        loop {
            match timeout(wait, self.ws.next()).await {
                Ok(Some(Ok(Message::Text(text)))) => return Some(text.as_str().to_owned()),
                Ok(Some(Ok(Message::Close(_)))) | Ok(None) | Ok(Some(Err(_))) | Err(_) => {
                    return None;
                }
                Ok(Some(Ok(_))) => continue,
            }
        }
    }
}

/// `register` frame.
pub fn register(username: &str, nickname: &str, password: &str) -> Value {
    json!({"action": "register", "data": {"username": username, "nickname": nickname, "password": password}})
}

/// `login` frame.
pub fn login(username: &str, password: &str) -> Value {
    json!({"action": "login", "data": {"username": username, "password": password}})
}

/// `message` frame.
pub fn chat(text: &str) -> Value {
    json!({"action": "message", "data": {"text": text}})
}

/// `get_online_users` frame.
pub fn online() -> Value {
    json!({"action": "get_online_users"})
}
