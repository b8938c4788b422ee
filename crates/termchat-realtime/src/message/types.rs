//! Inbound and outbound WebSocket frame definitions.

use serde::{Deserialize, Serialize};

/// Error text sent when a registration hits an existing identity.
pub const USERNAME_EXISTS: &str = "Username exists";

/// Error text sent when a login is refused.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// `register` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Identity (login handle).
    pub username: String,
    /// Display name.
    pub nickname: String,
    /// Secret.
    pub password: String,
}

/// `login` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Identity (login handle).
    pub username: String,
    /// Secret.
    pub password: String,
}

/// `message` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Chat text, relayed verbatim.
    pub text: String,
}

/// Actions sent by the client, as `{"action": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Create an identity.
    Register(RegisterRequest),
    /// Bind an identity to the connection.
    Login(LoginRequest),
    /// Relay chat text to everyone else.
    Message(ChatRequest),
    /// Ask for the display names flagged online.
    GetOnlineUsers,
    /// Well-formed envelope with an action this server does not know.
    #[serde(skip_serializing)]
    Unknown(String),
}

impl InboundMessage {
    /// The wire name of the action.
    pub fn action(&self) -> &str {
        match self {
            Self::Register(_) => "register",
            Self::Login(_) => "login",
            Self::Message(_) => "message",
            Self::GetOnlineUsers => "get_online_users",
            Self::Unknown(action) => action,
        }
    }
}

/// Pushes tagged with `type`, carrying their body in `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Chat line, `"<nickname>|<text>"`.
    Message(String),
    /// Lifecycle notice, `"<nickname>|connected"` or `"<nickname>|disconnected"`.
    System(String),
    /// Presence snapshot.
    OnlineUsers(Vec<String>),
}

/// Positive reply to `register` or `login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckReply {
    /// Always `true`.
    pub success: bool,
    /// Display name, present on login replies only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// Negative reply to `register` or `login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    /// Client-visible reason.
    pub error: String,
}

/// Everything the server sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    /// Broadcast or presence push.
    Event(ServerEvent),
    /// Positive reply.
    Ack(AckReply),
    /// Negative reply.
    Error(ErrorReply),
}

impl OutboundMessage {
    /// `{"success": true}`
    pub fn registered() -> Self {
        Self::Ack(AckReply {
            success: true,
            nickname: None,
        })
    }

    /// `{"success": true, "nickname": ...}`
    pub fn logged_in(nickname: impl Into<String>) -> Self {
        Self::Ack(AckReply {
            success: true,
            nickname: Some(nickname.into()),
        })
    }

    /// `{"error": ...}`
    pub fn error(reason: impl Into<String>) -> Self {
        Self::Error(ErrorReply {
            error: reason.into(),
        })
    }

    /// `{"type": "message", "data": ...}`
    pub fn chat(line: impl Into<String>) -> Self {
        Self::Event(ServerEvent::Message(line.into()))
    }

    /// `{"type": "system", "data": ...}`
    pub fn system(line: impl Into<String>) -> Self {
        Self::Event(ServerEvent::System(line.into()))
    }

    /// `{"type": "online_users", "data": [...]}`
    pub fn online_users(names: Vec<String>) -> Self {
        Self::Event(ServerEvent::OnlineUsers(names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outbound_wire_shapes() {
        let cases = [
            (OutboundMessage::registered(), json!({"success": true})),
            (
                OutboundMessage::logged_in("Alice"),
                json!({"success": true, "nickname": "Alice"}),
            ),
            (
                OutboundMessage::error(USERNAME_EXISTS),
                json!({"error": "Username exists"}),
            ),
            (
                OutboundMessage::chat("Alice|hi"),
                json!({"type": "message", "data": "Alice|hi"}),
            ),
            (
                OutboundMessage::system("Alice|connected"),
                json!({"type": "system", "data": "Alice|connected"}),
            ),
            (
                OutboundMessage::online_users(vec!["Alice".into(), "Bob".into()]),
                json!({"type": "online_users", "data": ["Alice", "Bob"]}),
            ),
        ];

        for (msg, expected) in cases {
            assert_eq!(serde_json::to_value(&msg).expect("serialize"), expected);
        }
    }

    #[test]
    fn test_outbound_parses_back_to_the_right_variant() {
        let parsed: OutboundMessage =
            serde_json::from_str(r#"{"error":"Invalid credentials"}"#).expect("parse");
        assert_eq!(parsed, OutboundMessage::error(INVALID_CREDENTIALS));

        let parsed: OutboundMessage =
            serde_json::from_str(r#"{"type":"system","data":"Bob|disconnected"}"#).expect("parse");
        assert_eq!(parsed, OutboundMessage::system("Bob|disconnected"));
    }

    #[test]
    fn test_inbound_serializes_as_envelope() {
        let msg = InboundMessage::Login(LoginRequest {
            username: "alice".into(),
            password: "pw1".into(),
        });
        assert_eq!(
            serde_json::to_value(&msg).expect("serialize"),
            json!({"action": "login", "data": {"username": "alice", "password": "pw1"}})
        );
        assert_eq!(
            serde_json::to_value(InboundMessage::GetOnlineUsers).expect("serialize"),
            json!({"action": "get_online_users"})
        );
    }
}
