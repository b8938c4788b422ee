//! Relay engine configuration.

use serde::{Deserialize, Serialize};

/// Relay engine (WebSocket fan-out) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Outbound frame buffer per connection. Frames beyond it are dropped.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Capacity of the engine's inbound event queue.
    #[serde(default = "default_event_queue")]
    pub event_queue_size: usize,
    /// Largest accepted inbound text frame, in bytes.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            event_queue_size: default_event_queue(),
            max_message_size: default_max_message_size(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_event_queue() -> usize {
    1024
}

fn default_max_message_size() -> usize {
    65_536
}
