//! Boundary parsing of inbound text frames.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use termchat_core::error::AppError;

use super::types::InboundMessage;

/// Why an inbound frame was rejected. Never surfaced to the client.
#[derive(Debug, Error)]
pub enum InboundError {
    /// The frame exceeds the configured size limit.
    #[error("frame of {size} bytes exceeds the {max} byte limit")]
    TooLarge {
        /// Frame size in bytes.
        size: usize,
        /// Configured limit.
        max: usize,
    },
    /// The frame is empty or whitespace.
    #[error("empty frame")]
    Empty,
    /// The frame is not a valid envelope, or its payload does not fit the action.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<InboundError> for AppError {
    fn from(err: InboundError) -> Self {
        AppError::validation(err.to_string())
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    action: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Parses a text frame into an [`InboundMessage`].
///
/// Unknown actions parse successfully as [`InboundMessage::Unknown`]; the
/// payload of known actions must match their request shape.
pub fn parse_inbound(raw: &str, max_size: usize) -> Result<InboundMessage, InboundError> {
    if raw.len() > max_size {
        return Err(InboundError::TooLarge {
            size: raw.len(),
            max: max_size,
        });
    }
    if raw.trim().is_empty() {
        return Err(InboundError::Empty);
    }

    let envelope: RawEnvelope = serde_json::from_str(raw)?;

    let msg = match envelope.action.as_str() {
        "register" => InboundMessage::Register(payload(envelope.data)?),
        "login" => InboundMessage::Login(payload(envelope.data)?),
        "message" => InboundMessage::Message(payload(envelope.data)?),
        "get_online_users" => InboundMessage::GetOnlineUsers,
        _ => InboundMessage::Unknown(envelope.action),
    };

    Ok(msg)
}

fn payload<T: DeserializeOwned>(data: serde_json::Value) -> Result<T, InboundError> {
    Ok(serde_json::from_value(data)?)
}
