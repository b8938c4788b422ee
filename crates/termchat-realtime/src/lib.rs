//! # termchat-realtime
//!
//! The relay core for TermChat. Provides:
//!
//! - Typed inbound/outbound WebSocket frames parsed once at the boundary
//! - The session registry of live connections
//! - The auth gate in front of register/login
//! - Broadcast fan-out for system notices, chat relay, and presence queries
//! - The connection lifecycle controller and the single-owner engine task

pub mod broadcast;
pub mod connection;
pub mod lifecycle;
pub mod message;
pub mod metrics;
pub mod server;

pub use broadcast::Broadcaster;
pub use connection::authenticator::AuthGate;
pub use connection::handle::{ConnectionHandle, ConnectionId};
pub use connection::registry::SessionRegistry;
pub use lifecycle::{ConnectionEvent, RelayCore};
pub use message::{InboundMessage, OutboundMessage};
pub use metrics::{MetricsSnapshot, RelayMetrics};
pub use server::{ConnectionLink, OutboundFrame, OutboundStream, RelayEngine};
