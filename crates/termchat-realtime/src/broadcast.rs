//! Broadcast engine: system notices, chat relay, and presence replies.

use std::sync::Arc;

use tracing::{debug, error};

use termchat_auth::store::CredentialStore;

use crate::connection::handle::{ConnectionId, SendStatus};
use crate::connection::registry::{ConnectionSession, SessionRegistry};
use crate::message::builder::{self, SystemNotice};
use crate::message::types::OutboundMessage;
use crate::metrics::{RelayMetrics, messages};

/// Fans frames out over the session registry.
///
/// Every fan-out serializes its frame once; sends to connections whose
/// transport is not open are skipped.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    metrics: Arc<RelayMetrics>,
}

impl Broadcaster {
    /// Creates a broadcaster that records into `metrics`.
    pub fn new(metrics: Arc<RelayMetrics>) -> Self {
        Self { metrics }
    }

    /// Sends `"<display_name>|<notice>"` to every open connection, the
    /// subject included. Returns the number of frames queued.
    pub fn system_notice(
        &self,
        registry: &SessionRegistry,
        display_name: &str,
        notice: SystemNotice,
    ) -> usize {
        let msg = builder::build_system_notice(display_name, notice);
        let queued = self.fan_out(registry, &msg, |_| true);
        debug!(
            display_name = %display_name,
            notice = notice.as_str(),
            recipients = queued,
            "System notice broadcast"
        );
        queued
    }

    /// Relays chat text to every open connection except the sender.
    pub fn relay_chat(
        &self,
        registry: &SessionRegistry,
        sender: ConnectionId,
        display_name: &str,
        text: &str,
    ) -> usize {
        let msg = builder::build_chat_line(display_name, text);
        let queued = self.fan_out(registry, &msg, |s| s.id() != sender);
        debug!(conn_id = %sender, recipients = queued, "Chat relayed");
        queued
    }

    /// Replies to `session` alone with the store's online display names.
    pub fn online_users(&self, store: &CredentialStore, session: &ConnectionSession) {
        let msg = OutboundMessage::online_users(store.list_online_display_names());
        let status = session.handle.send(&msg);
        self.record(status);
    }

    fn fan_out<P>(&self, registry: &SessionRegistry, msg: &OutboundMessage, predicate: P) -> usize
    where
        P: Fn(&ConnectionSession) -> bool,
    {
        let frame = match serde_json::to_string(msg) {
            Ok(frame) => frame,
            Err(e) => {
                error!(error = %e, "Failed to serialize broadcast frame");
                return 0;
            }
        };

        let mut queued = 0;
        registry.for_each(
            |s| s.handle.is_open() && predicate(s),
            |s| {
                let status = s.handle.send_raw(frame.clone());
                if status == SendStatus::Queued {
                    queued += 1;
                }
                self.record(status);
            },
        );
        queued
    }

    fn record(&self, status: SendStatus) {
        match status {
            SendStatus::Queued => messages::record_sent(&self.metrics, 1),
            SendStatus::Dropped => messages::record_dropped(&self.metrics),
            SendStatus::Skipped => {}
        }
    }
}
