//! Persisted identity record.

use serde::{Deserialize, Serialize};

/// A registered identity, keyed by its login handle in the store.
///
/// Field names on disk are `nickname`, `password` and `online`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Human-readable label shown to other users. Not unique.
    #[serde(rename = "nickname")]
    pub display_name: String,
    /// One-way hash of the login secret.
    #[serde(rename = "password")]
    pub credential_hash: String,
    /// Presence flag.
    #[serde(rename = "online", default)]
    pub is_online: bool,
}

impl IdentityRecord {
    /// Creates a freshly registered record, already marked online.
    pub fn new(display_name: impl Into<String>, credential_hash: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            credential_hash: credential_hash.into(),
            is_online: true,
        }
    }
}
