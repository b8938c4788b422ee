//! Line rendering for server frames.

use chrono::{DateTime, Local};

use termchat_realtime::message::{OutboundMessage, ServerEvent};

/// `[HH:MM:SS]`
pub fn timestamp(at: DateTime<Local>) -> String {
    at.format("[%H:%M:%S]").to_string()
}

/// Renders one frame from the server as a display line.
pub fn render(msg: &OutboundMessage, ts: &str) -> String {
    match msg {
        OutboundMessage::Event(event) => render_event(event, ts),
        OutboundMessage::Ack(ack) => match &ack.nickname {
            Some(nick) => format!("{ts} Logged in as {nick}"),
            None => format!("{ts} OK"),
        },
        OutboundMessage::Error(err) => format!("{ts} Error: {}", err.error),
    }
}

fn render_event(event: &ServerEvent, ts: &str) -> String {
    match event {
        ServerEvent::Message(line) => match line.split_once('|') {
            Some((nick, text)) => chat_line(ts, nick.trim(), text.trim()),
            None => format!("{ts} {line}"),
        },
        ServerEvent::System(line) => match line.split_once('|') {
            Some((nick, action)) if action.trim() == "connected" => {
                format!("{ts} *** {} joined the chat ***", nick.trim())
            }
            Some((nick, action)) if action.trim() == "disconnected" => {
                format!("{ts} *** {} left the chat ***", nick.trim())
            }
            _ => format!("{ts} SYSTEM: {line}"),
        },
        ServerEvent::OnlineUsers(names) => format!("{ts} Online users: {}", names.join(", ")),
    }
}

/// `[ts] <nick> text`, also used to echo our own messages.
pub fn chat_line(ts: &str, nick: &str, text: &str) -> String {
    format!("{ts} <{nick}> {text}")
}

/// Banner shown after login.
pub fn welcome(nickname: &str) -> Vec<String> {
    vec![
        r"  _____              ___ _         _   ".to_string(),
        r" |_   _|__ _ _ _ __ / __| |_  __ _| |_ ".to_string(),
        r"   | |/ -_) '_| '  \ (__| ' \/ _` |  _|".to_string(),
        format!(r"   |_|\___|_| |_|_|_\___|_||_\__,_|\__| v{}", env!("CARGO_PKG_VERSION")),
        String::new(),
        format!(" [+] Welcome to the chat, {nickname}!"),
        String::new(),
        " /online - show online users".to_string(),
        " /quit - exit".to_string(),
        "-".repeat(47),
    ]
}
