//! Command-line arguments and top-level flow.

use std::path::PathBuf;

use clap::Parser;
use tokio_tungstenite::connect_async;
use tracing::info;

use termchat_core::error::{AppError, ErrorKind};
use termchat_core::result::AppResult;

use crate::{auth, chat};

/// TermChat terminal chat client
#[derive(Debug, Parser)]
#[command(name = "termchat", version, about, long_about = None)]
pub struct Cli {
    /// Relay WebSocket URL
    #[arg(short, long, default_value = "ws://localhost:8081")]
    pub url: String,

    /// Saved credentials file
    #[arg(short, long, default_value = "login.json")]
    pub login_file: PathBuf,
}

impl Cli {
    /// Connect, authenticate, then chat until `/quit` or disconnect.
    pub async fn execute(&self) -> AppResult<()> {
        let (mut ws, _) = connect_async(self.url.as_str()).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ServiceUnavailable,
                format!("Cannot connect to {}", self.url),
                e,
            )
        })?;
        info!(url = %self.url, "Connected");

        let nickname = auth::authenticate(&mut ws, &self.login_file).await?;
        chat::run(ws, &nickname).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["termchat"]);
        assert_eq!(cli.url, "ws://localhost:8081");
        assert_eq!(cli.login_file, PathBuf::from("login.json"));
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from(["termchat", "--url", "ws://chat:9000", "-l", "me.json"]);
        assert_eq!(cli.url, "ws://chat:9000");
        assert_eq!(cli.login_file, PathBuf::from("me.json"));
    }
}
