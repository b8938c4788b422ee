//! Interactive chat loop: stdin lines out, server frames in.

use chrono::Local;
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use termchat_core::result::AppResult;
use termchat_realtime::message::{ChatRequest, InboundMessage, OutboundMessage};

use crate::auth::{self, WsStream};
use crate::output;

/// A line typed by the user.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Online,
    /// The line exactly as typed.
    Say(&'a str),
    Nothing,
}

fn parse_command(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Nothing;
    }
    match trimmed.to_lowercase().as_str() {
        "/quit" => Command::Quit,
        "/online" => Command::Online,
        _ => Command::Say(line),
    }
}

/// Runs until `/quit`, end of input, or the server going away.
pub async fn run(mut ws: WsStream, nickname: &str) -> AppResult<()> {
    for line in output::welcome(nickname) {
        println!("{line}");
    }
    auth::send(&mut ws, &InboundMessage::GetOnlineUsers).await?;

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            frame = ws.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<OutboundMessage>(text.as_str()) {
                        Ok(msg) => println!("{}", output::render(&msg, &output::timestamp(Local::now()))),
                        Err(e) => warn!(error = %e, "Unreadable frame from server"),
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    println!("{} *** Connection to server lost ***", output::timestamp(Local::now()));
                    return Ok(());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    println!("{} Error: {}", output::timestamp(Local::now()), e);
                    return Ok(());
                }
            },
            line = stdin.next_line() => {
                let line = line?;
                let Some(line) = line else { break };
                match parse_command(&line) {
                    Command::Quit => break,
                    Command::Online => auth::send(&mut ws, &InboundMessage::GetOnlineUsers).await?,
                    Command::Say(text) => {
                        println!("{}", output::chat_line(&output::timestamp(Local::now()), nickname, text));
                        let request = InboundMessage::Message(ChatRequest { text: text.to_string() });
                        auth::send(&mut ws, &request).await?;
                    }
                    Command::Nothing => {}
                }
            }
        }
    }

    if let Err(e) = ws.close(None).await {
        debug!(error = %e, "Close handshake failed");
    }
    Ok(())
}
