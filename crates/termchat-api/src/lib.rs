//! # termchat-api
//!
//! HTTP surface for TermChat built on Axum: the WebSocket upgrade that feeds
//! the relay engine, and the standalone health responder.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::{health_router, relay_router};
pub use state::RelayState;
