//! Login from saved credentials, or interactive registration.

use std::path::Path;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use termchat_auth::PasswordHasher;
use termchat_core::error::{AppError, ErrorKind};
use termchat_core::result::AppResult;
use termchat_realtime::message::{
    InboundMessage, LoginRequest, OutboundMessage, RegisterRequest,
};

use crate::login_file::{self, LoginFileState, SavedLogin};

/// Client WebSocket.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Logs in, registering first when no saved credentials exist.
///
/// Returns the display name the server bound to this connection.
pub async fn authenticate(ws: &mut WsStream, path: &Path) -> AppResult<String> {
    let hasher = PasswordHasher::new();

    loop {
        match login_file::load(path) {
            LoginFileState::Found(saved) => return login(ws, &hasher, &saved).await,
            LoginFileState::Missing => {
                println!("[*] {} not found, please create account.", path.display());
                register(ws, &hasher, path).await?;
            }
            LoginFileState::Corrupt(e) => {
                warn!(path = %path.display(), error = %e, "Discarding unreadable credentials file");
                login_file::remove(path)?;
            }
        }
    }
}

async fn login(
    ws: &mut WsStream,
    hasher: &PasswordHasher,
    saved: &SavedLogin,
) -> AppResult<String> {
    let request = InboundMessage::Login(LoginRequest {
        username: saved.username.clone(),
        password: hasher.hash_password(&saved.password),
    });
    send(ws, &request).await?;

    match recv_reply(ws).await? {
        OutboundMessage::Ack(ack) => ack
            .nickname
            .ok_or_else(|| AppError::internal("Login reply carried no nickname")),
        OutboundMessage::Error(err) => Err(AppError::authentication(err.error)),
        OutboundMessage::Event(_) => Err(AppError::internal("Unexpected reply to login")),
    }
}

/// Prompts until the server accepts a registration, then saves the file.
async fn register(ws: &mut WsStream, hasher: &PasswordHasher, path: &Path) -> AppResult<()> {
    loop {
        let form = tokio::task::spawn_blocking(prompt_registration)
            .await
            .map_err(|e| AppError::internal(format!("Prompt task failed: {}", e)))??;

        let request = InboundMessage::Register(RegisterRequest {
            username: form.username.clone(),
            nickname: form.nickname,
            password: hasher.hash_password(&form.password),
        });
        send(ws, &request).await?;

        match recv_reply(ws).await? {
            OutboundMessage::Error(err) => {
                println!("[!] Error: {}", err.error);
                continue;
            }
            OutboundMessage::Ack(_) => {
                let saved = SavedLogin {
                    username: form.username,
                    password: form.password,
                };
                login_file::save(path, &saved)?;
                return Ok(());
            }
            OutboundMessage::Event(_) => {
                return Err(AppError::internal("Unexpected reply to register"));
            }
        }
    }
}

struct RegistrationForm {
    username: String,
    nickname: String,
    password: String,
}

fn prompt_registration() -> AppResult<RegistrationForm> {
    let input_err = |e: dialoguer::Error| AppError::internal(format!("Input error: {}", e));

    let username: String = dialoguer::Input::new()
        .with_prompt("[?] Username")
        .interact_text()
        .map_err(input_err)?;
    let nickname: String = dialoguer::Input::new()
        .with_prompt("[?] Nickname")
        .interact_text()
        .map_err(input_err)?;
    let password = dialoguer::Password::new()
        .with_prompt("[?] Password")
        .with_confirmation("[?] Confirm ", "[!] Passwords don't match. Please try again.")
        .interact()
        .map_err(input_err)?;

    Ok(RegistrationForm {
        username,
        nickname,
        password,
    })
}

/// Serializes and sends one request.
pub async fn send(ws: &mut WsStream, request: &InboundMessage) -> AppResult<()> {
    let json = serde_json::to_string(request)?;
    ws.send(Message::text(json))
        .await
        .map_err(|e| AppError::with_source(ErrorKind::ServiceUnavailable, "Send failed", e))
}

/// Waits for the next reply frame, skipping pushes that arrive first.
async fn recv_reply(ws: &mut WsStream) -> AppResult<OutboundMessage> {
    while let Some(frame) = ws.next().await {
        let frame = frame.map_err(|e| {
            AppError::with_source(ErrorKind::ServiceUnavailable, "Connection error", e)
        })?;
        match frame {
            Message::Text(text) => match serde_json::from_str::<OutboundMessage>(text.as_str())? {
                OutboundMessage::Event(event) => debug!(?event, "Push before reply skipped"),
                reply => return Ok(reply),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }
    Err(AppError::service_unavailable("Connection closed by server"))
}
