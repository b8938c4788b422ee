//! Top-level relay engine: one task that owns the [`RelayCore`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use termchat_auth::store::CredentialStore;
use termchat_core::config::RealtimeConfig;
use termchat_core::error::AppError;

use crate::connection::handle::ConnectionId;
use crate::lifecycle::{ConnectionEvent, RelayCore};
use crate::metrics::{MetricsSnapshot, RelayMetrics};

/// Cloneable front door to the engine task.
///
/// Connection tasks never touch relay state directly; they post
/// [`ConnectionEvent`]s and the engine applies them in arrival order.
#[derive(Clone)]
pub struct RelayEngine {
    events: mpsc::Sender<ConnectionEvent>,
    next_id: Arc<AtomicU64>,
    channel_buffer_size: usize,
    metrics: Arc<RelayMetrics>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for RelayEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayEngine").finish()
    }
}

impl RelayEngine {
    /// Starts the engine task around a loaded credential store.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(store: CredentialStore, config: &RealtimeConfig) -> (Self, JoinHandle<()>) {
        let metrics = Arc::new(RelayMetrics::new());
        let (events, mut rx) = mpsc::channel(config.event_queue_size.max(1));
        let shutdown = CancellationToken::new();

        let mut core = RelayCore::new(store, config, metrics.clone());
        let stop = shutdown.clone();

        let task = tokio::spawn(async move {
            info!("Relay engine started");
            loop {
                tokio::select! {
                    biased;
                    _ = stop.cancelled() => {
                        // Apply whatever is already queued so no opened
                        // connection misses its close request.
                        rx.close();
                        while let Some(event) = rx.recv().await {
                            core.handle(event);
                        }
                        core.shutdown();
                        break;
                    }
                    event = rx.recv() => match event {
                        Some(event) => core.handle(event),
                        None => break,
                    },
                }
            }
            info!("Relay engine stopped");
        });

        let engine = Self {
            events,
            next_id: Arc::new(AtomicU64::new(1)),
            channel_buffer_size: config.channel_buffer_size.max(1),
            metrics,
            shutdown,
        };

        (engine, task)
    }

    /// Registers a new transport with the engine.
    ///
    /// Returns the link used to report inbound traffic and the stream of
    /// frames the transport must write.
    pub async fn connect(&self) -> Result<(ConnectionLink, OutboundStream), AppError> {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, rx) = mpsc::channel(self.channel_buffer_size);
        let closer = CancellationToken::new();

        self.events
            .send(ConnectionEvent::Opened {
                id,
                sender,
                closer: closer.clone(),
            })
            .await
            .map_err(|_| AppError::service_unavailable("Relay engine is not running"))?;

        let link = ConnectionLink {
            id,
            events: self.events.clone(),
        };
        Ok((link, OutboundStream { rx, closer }))
    }

    /// Stops the engine task after asking every connection to close.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Whether the engine task is still accepting events.
    pub fn is_running(&self) -> bool {
        !self.events.is_closed()
    }

    /// Current counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// A transport's handle for reporting inbound traffic.
#[derive(Debug)]
pub struct ConnectionLink {
    id: ConnectionId,
    events: mpsc::Sender<ConnectionEvent>,
}

impl ConnectionLink {
    /// Connection ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Forwards a text frame. Returns `false` once the engine has stopped.
    pub async fn inbound(&self, text: String) -> bool {
        self.events
            .send(ConnectionEvent::Inbound { id: self.id, text })
            .await
            .is_ok()
    }

    /// Reports the transport closed. Consumes the link.
    pub async fn close(self) {
        if self
            .events
            .send(ConnectionEvent::Closed { id: self.id })
            .await
            .is_err()
        {
            debug!(conn_id = %self.id, "Engine gone before close was reported");
        }
    }
}

/// A frame the transport must write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// A text frame.
    Text(String),
    /// Close the socket.
    Close,
}

/// Frames queued for one transport.
#[derive(Debug)]
pub struct OutboundStream {
    rx: mpsc::Receiver<String>,
    closer: CancellationToken,
}

impl OutboundStream {
    /// Next frame to write. Queued text is flushed before a close request
    /// takes effect. `None` once the engine has dropped the connection.
    pub async fn next(&mut self) -> Option<OutboundFrame> {
        tokio::select! {
            biased;
            frame = self.rx.recv() => match frame {
                Some(text) => Some(OutboundFrame::Text(text)),
                None if self.closer.is_cancelled() => Some(OutboundFrame::Close),
                None => None,
            },
            _ = self.closer.cancelled() => Some(OutboundFrame::Close),
        }
    }
}
