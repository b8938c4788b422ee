//! Individual WebSocket connection handle.

use std::fmt;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::message::types::OutboundMessage;

/// Connection identifier. Allocated in increasing order, so ordering by id
/// is registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a single push attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    /// Queued for the writer.
    Queued,
    /// The transport is closing or closed; nothing was queued.
    Skipped,
    /// The outbound buffer was full; the frame was discarded.
    Dropped,
}

/// The engine's side of one transport connection.
///
/// Holds the sender for pushing serialized frames to the writer task, and
/// the token that asks the writer to close the socket.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Connection ID.
    pub id: ConnectionId,
    /// Sender for outbound frames.
    sender: mpsc::Sender<String>,
    /// Cancelled once a close has been requested.
    closer: CancellationToken,
}

impl ConnectionHandle {
    /// Create a new connection handle.
    pub fn new(id: ConnectionId, sender: mpsc::Sender<String>, closer: CancellationToken) -> Self {
        Self { id, sender, closer }
    }

    /// Whether the transport is open: no close requested and the writer is alive.
    pub fn is_open(&self) -> bool {
        !self.closer.is_cancelled() && !self.sender.is_closed()
    }

    /// Push an already-serialized frame.
    pub fn send_raw(&self, frame: String) -> SendStatus {
        if !self.is_open() {
            return SendStatus::Skipped;
        }
        match self.sender.try_send(frame) {
            Ok(()) => SendStatus::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(conn_id = %self.id, "Send buffer full, dropping frame");
                SendStatus::Dropped
            }
            Err(mpsc::error::TrySendError::Closed(_)) => SendStatus::Skipped,
        }
    }

    /// Serialize and push a message.
    pub fn send(&self, msg: &OutboundMessage) -> SendStatus {
        match serde_json::to_string(msg) {
            Ok(frame) => self.send_raw(frame),
            Err(e) => {
                error!(conn_id = %self.id, error = %e, "Failed to serialize outbound message");
                SendStatus::Dropped
            }
        }
    }

    /// Ask the writer to close the socket once queued frames are flushed.
    pub fn close(&self) {
        self.closer.cancel();
    }
}
