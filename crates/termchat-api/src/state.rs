//! State shared by the relay handlers.

use termchat_realtime::RelayEngine;

/// Passed to every relay handler via `State<RelayState>`.
#[derive(Debug, Clone)]
pub struct RelayState {
    /// Front door to the engine task.
    pub engine: RelayEngine,
}

impl RelayState {
    /// Wraps a running engine.
    pub fn new(engine: RelayEngine) -> Self {
        Self { engine }
    }
}
