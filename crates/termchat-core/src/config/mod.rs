//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files plus `TERMCHAT__*` environment variables. Each
//! sub-module represents a logical configuration section.

pub mod app;
pub mod logging;
pub mod realtime;
pub mod store;

use serde::{Deserialize, Serialize};

pub use self::app::{HealthConfig, ServerConfig};
pub use self::logging::LoggingConfig;
pub use self::realtime::RealtimeConfig;
pub use self::store::StoreConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Every section falls back to its defaults, so an empty source set yields
/// a runnable configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// WebSocket listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Health-check listener settings.
    #[serde(default)]
    pub health: HealthConfig,
    /// Credential store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Relay engine settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `<dir>/default`, `<dir>/<env>` and the
    /// environment.
    ///
    /// Both files are optional. Environment variables use the `TERMCHAT`
    /// prefix and `__` as the section separator, e.g.
    /// `TERMCHAT__SERVER__PORT=9000`.
    pub fn load(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TERMCHAT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
