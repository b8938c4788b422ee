//! Session registry: every live transport connection, in registration order.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::handle::{ConnectionHandle, ConnectionId};

/// Identity bound to a connection by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Login handle.
    pub identity: String,
    /// Display name at login time.
    pub display_name: String,
}

/// Authentication state of a live connection. `Closed` is represented by
/// removal from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// May only register or log in.
    Unauthenticated,
    /// Identity bound; never rebound.
    Authenticated(SessionIdentity),
}

/// One registered connection.
#[derive(Debug)]
pub struct ConnectionSession {
    /// Transport handle.
    pub handle: ConnectionHandle,
    /// When the transport opened.
    pub connected_at: DateTime<Utc>,
    state: SessionState,
}

impl ConnectionSession {
    /// Create an unauthenticated session.
    pub fn new(handle: ConnectionHandle) -> Self {
        Self {
            handle,
            connected_at: Utc::now(),
            state: SessionState::Unauthenticated,
        }
    }

    /// Connection ID.
    pub fn id(&self) -> ConnectionId {
        self.handle.id
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The bound identity, if logged in.
    pub fn identity(&self) -> Option<&SessionIdentity> {
        match &self.state {
            SessionState::Authenticated(identity) => Some(identity),
            SessionState::Unauthenticated => None,
        }
    }

    /// Whether an identity is bound.
    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    /// Bind an identity. Returns `false` and leaves the session untouched if
    /// one is already bound.
    pub fn bind(&mut self, identity: SessionIdentity) -> bool {
        if self.is_authenticated() {
            return false;
        }
        self.state = SessionState::Authenticated(identity);
        true
    }
}

/// All live connections, authenticated or not.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: BTreeMap<ConnectionId, ConnectionSession>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new, unauthenticated connection.
    pub fn add(&mut self, handle: ConnectionHandle) {
        let id = handle.id;
        self.sessions.insert(id, ConnectionSession::new(handle));
        debug!(conn_id = %id, total = self.sessions.len(), "Connection registered");
    }

    /// Removes a connection, returning its session.
    pub fn remove(&mut self, id: ConnectionId) -> Option<ConnectionSession> {
        self.sessions.remove(&id)
    }

    /// Looks up a session.
    pub fn get(&self, id: ConnectionId) -> Option<&ConnectionSession> {
        self.sessions.get(&id)
    }

    /// Looks up a session for mutation.
    pub fn get_mut(&mut self, id: ConnectionId) -> Option<&mut ConnectionSession> {
        self.sessions.get_mut(&id)
    }

    /// Runs `action` on every session matching `predicate`, in connection-id
    /// order (which is registration order).
    pub fn for_each<P, F>(&self, predicate: P, mut action: F)
    where
        P: Fn(&ConnectionSession) -> bool,
        F: FnMut(&ConnectionSession),
    {
        self.sessions
            .values()
            .filter(|s| predicate(s))
            .for_each(|s| action(s));
    }

    /// Total registered connections.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no connection is registered.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Connections with a bound identity.
    pub fn authenticated_count(&self) -> usize {
        self.sessions.values().filter(|s| s.is_authenticated()).count()
    }
}
