//! Connection lifecycle controller: the relay's single owner of mutable state.
//!
//! Every transport event is applied here, one at a time, by the engine task.
//! A connection moves `Unauthenticated → Authenticated → Closed`; closed
//! connections are simply removed from the registry.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use termchat_auth::store::CredentialStore;
use termchat_core::config::RealtimeConfig;

use crate::broadcast::Broadcaster;
use crate::connection::authenticator::{AuthGate, LoginOutcome};
use crate::connection::handle::{ConnectionHandle, ConnectionId};
use crate::connection::registry::SessionRegistry;
use crate::message::builder::SystemNotice;
use crate::message::parser::parse_inbound;
use crate::message::types::InboundMessage;
use crate::metrics::{RelayMetrics, connections, messages};

/// A transport event delivered to the engine.
#[derive(Debug)]
pub enum ConnectionEvent {
    /// A transport opened. Frames pushed into `sender` are written to the
    /// socket; cancelling `closer` asks the writer to close it.
    Opened {
        /// Connection ID.
        id: ConnectionId,
        /// Outbound frame queue.
        sender: mpsc::Sender<String>,
        /// Close request token.
        closer: CancellationToken,
    },
    /// A text frame arrived.
    Inbound {
        /// Connection ID.
        id: ConnectionId,
        /// Raw frame text.
        text: String,
    },
    /// The transport closed, for whatever reason.
    Closed {
        /// Connection ID.
        id: ConnectionId,
    },
}

/// Credential store, session registry, and broadcaster under one owner.
#[derive(Debug)]
pub struct RelayCore {
    store: CredentialStore,
    registry: SessionRegistry,
    broadcaster: Broadcaster,
    metrics: Arc<RelayMetrics>,
    max_message_size: usize,
}

impl RelayCore {
    /// Creates the core around a loaded store.
    pub fn new(store: CredentialStore, config: &RealtimeConfig, metrics: Arc<RelayMetrics>) -> Self {
        Self {
            store,
            registry: SessionRegistry::new(),
            broadcaster: Broadcaster::new(metrics.clone()),
            metrics,
            max_message_size: config.max_message_size,
        }
    }

    /// Applies one event to completion.
    pub fn handle(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Opened { id, sender, closer } => self.on_open(id, sender, closer),
            ConnectionEvent::Inbound { id, text } => self.on_text(id, &text),
            ConnectionEvent::Closed { id } => self.on_close(id),
        }
    }

    /// Registers a new unauthenticated connection.
    pub fn on_open(&mut self, id: ConnectionId, sender: mpsc::Sender<String>, closer: CancellationToken) {
        self.registry.add(ConnectionHandle::new(id, sender, closer));
        connections::record_connect(&self.metrics);
        info!(conn_id = %id, total = self.registry.len(), "Connection opened");
    }

    /// Parses and dispatches one inbound text frame.
    ///
    /// Malformed frames are logged and dropped; the connection stays open
    /// and no reply is sent.
    pub fn on_text(&mut self, id: ConnectionId, raw: &str) {
        messages::record_received(&self.metrics);

        let Some(session) = self.registry.get(id) else {
            warn!(conn_id = %id, "Frame for an unknown connection");
            return;
        };
        if !session.handle.is_open() {
            debug!(conn_id = %id, "Frame from a closing connection ignored");
            return;
        }

        match parse_inbound(raw, self.max_message_size) {
            Ok(msg) => self.dispatch(id, msg),
            Err(e) => {
                messages::record_malformed(&self.metrics);
                warn!(conn_id = %id, error = %e, "Malformed payload ignored");
            }
        }
    }

    /// Removes a connection. An authenticated one is marked offline and
    /// announced as disconnected to everyone still open.
    pub fn on_close(&mut self, id: ConnectionId) {
        let Some(session) = self.registry.remove(id) else {
            debug!(conn_id = %id, "Close for an unknown connection");
            return;
        };
        connections::record_disconnect(&self.metrics);
        let connected_secs = (Utc::now() - session.connected_at).num_seconds();

        match session.identity() {
            Some(identity) => {
                self.store.mark_offline(&identity.identity);
                info!(
                    conn_id = %id,
                    identity = %identity.identity,
                    connected_secs,
                    authenticated = self.registry.authenticated_count(),
                    "Authenticated connection closed"
                );
                self.broadcaster.system_notice(
                    &self.registry,
                    &identity.display_name,
                    SystemNotice::Disconnected,
                );
            }
            None => info!(conn_id = %id, connected_secs, "Connection closed"),
        }
    }

    /// Asks every connection to close. Returns how many were open.
    pub fn shutdown(&mut self) -> usize {
        let mut closed = 0;
        self.registry.for_each(
            |s| s.handle.is_open(),
            |s| {
                s.handle.close();
                closed += 1;
            },
        );
        info!(connections = closed, "Closing all connections");
        closed
    }

    /// The credential store.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// The session registry.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    fn dispatch(&mut self, id: ConnectionId, msg: InboundMessage) {
        debug!(conn_id = %id, action = msg.action(), "Dispatching frame");

        match msg {
            InboundMessage::Register(req) => {
                if let Some(session) = self.registry.get(id) {
                    AuthGate::register(&mut self.store, session, &req);
                }
            }
            InboundMessage::Login(req) => {
                let Some(session) = self.registry.get_mut(id) else {
                    return;
                };
                if let LoginOutcome::Authenticated { display_name } =
                    AuthGate::login(&mut self.store, session, &req)
                {
                    self.broadcaster
                        .system_notice(&self.registry, &display_name, SystemNotice::Connected);
                }
            }
            InboundMessage::Message(req) => {
                let Some(session) = self.registry.get(id) else {
                    return;
                };
                match session.identity() {
                    Some(identity) => {
                        self.broadcaster.relay_chat(
                            &self.registry,
                            id,
                            &identity.display_name,
                            &req.text,
                        );
                    }
                    None => debug!(conn_id = %id, "Chat from unauthenticated connection dropped"),
                }
            }
            InboundMessage::GetOnlineUsers => {
                if let Some(session) = self.registry.get(id) {
                    self.broadcaster.online_users(&self.store, session);
                }
            }
            InboundMessage::Unknown(action) => {
                debug!(conn_id = %id, action = %action, "Unknown action ignored");
            }
        }
    }
}
