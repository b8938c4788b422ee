//! Relay engine metrics.

pub mod connections;
pub mod messages;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct RelayMetrics {
    /// Total connections ever opened
    pub connections_opened: AtomicU64,
    /// Connections currently registered
    pub connections_active: AtomicU64,
    /// Text frames received from clients
    pub frames_received: AtomicU64,
    /// Broadcast and presence frames queued to clients
    pub frames_sent: AtomicU64,
    /// Frames discarded because a send buffer was full
    pub frames_dropped: AtomicU64,
    /// Inbound frames rejected by the parser
    pub malformed_payloads: AtomicU64,
}

impl RelayMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            frames_received: self.frames_received.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            malformed_payloads: self.malformed_payloads.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total connections ever opened
    pub connections_opened: u64,
    /// Connections currently registered
    pub connections_active: u64,
    /// Text frames received from clients
    pub frames_received: u64,
    /// Broadcast and presence frames queued to clients
    pub frames_sent: u64,
    /// Frames discarded because a send buffer was full
    pub frames_dropped: u64,
    /// Inbound frames rejected by the parser
    pub malformed_payloads: u64,
}
