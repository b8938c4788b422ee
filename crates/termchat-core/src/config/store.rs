//! Credential store configuration.

use serde::{Deserialize, Serialize};

/// Location of the persisted identity mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON file holding identity records.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

fn default_path() -> String {
    "users.json".to_string()
}
