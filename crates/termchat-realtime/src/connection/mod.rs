//! Connection handles, the session registry, and the auth gate.

pub mod authenticator;
pub mod handle;
pub mod registry;

pub use authenticator::{AuthGate, LoginOutcome};
pub use handle::{ConnectionHandle, ConnectionId};
pub use registry::{ConnectionSession, SessionIdentity, SessionRegistry, SessionState};
