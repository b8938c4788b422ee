//! WebSocket frame types, parsing, and builders.

pub mod builder;
pub mod parser;
pub mod types;

pub use parser::{InboundError, parse_inbound};
pub use types::{
    AckReply, ChatRequest, ErrorReply, InboundMessage, LoginRequest, OutboundMessage,
    RegisterRequest, ServerEvent,
};
