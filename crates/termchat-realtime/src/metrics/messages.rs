//! Frame metrics helpers.

use std::sync::atomic::Ordering;

use super::RelayMetrics;

/// Record a text frame received from a client
pub fn record_received(metrics: &RelayMetrics) {
    metrics.frames_received.fetch_add(1, Ordering::Relaxed);
}

/// Record frames queued to clients
pub fn record_sent(metrics: &RelayMetrics, count: u64) {
    metrics.frames_sent.fetch_add(count, Ordering::Relaxed);
}

/// Record a frame dropped on a full buffer
pub fn record_dropped(metrics: &RelayMetrics) {
    metrics.frames_dropped.fetch_add(1, Ordering::Relaxed);
}

/// Record an inbound frame the parser rejected
pub fn record_malformed(metrics: &RelayMetrics) {
    metrics.malformed_payloads.fetch_add(1, Ordering::Relaxed);
}
