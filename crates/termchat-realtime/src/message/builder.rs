//! Builders for the `"<nickname>|<body>"` lines carried by pushes.

use super::types::OutboundMessage;

/// Lifecycle transitions announced to every open connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemNotice {
    /// A connection logged in.
    Connected,
    /// An authenticated connection closed.
    Disconnected,
}

impl SystemNotice {
    /// Wire suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

/// Build a system notice push for `display_name`.
pub fn build_system_notice(display_name: &str, notice: SystemNotice) -> OutboundMessage {
    OutboundMessage::system(format!("{display_name}|{}", notice.as_str()))
}

/// Build a chat relay push. `text` is carried verbatim.
pub fn build_chat_line(display_name: &str, text: &str) -> OutboundMessage {
    OutboundMessage::chat(format!("{display_name}|{text}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines() {
        assert_eq!(
            build_system_notice("Alice", SystemNotice::Disconnected),
            OutboundMessage::system("Alice|disconnected")
        );
        assert_eq!(
            build_chat_line("Alice", "a | b"),
            OutboundMessage::chat("Alice|a | b")
        );
    }
}
