//! Credential store: identity records, presence flags, and persistence.

use tracing::{debug, error, info};

use termchat_core::error::AppError;

use crate::password::PasswordHasher;

use super::error::{LoginError, RegisterError};
use super::persistence::{CredentialPersistence, IdentityMap};
use super::record::IdentityRecord;

/// Owns every identity record.
///
/// Not internally synchronized: the relay engine is the single owner and
/// calls it from one task at a time.
#[derive(Debug)]
pub struct CredentialStore {
    /// Identity handle → record.
    records: IdentityMap,
    /// Load/save backend.
    persistence: Box<dyn CredentialPersistence>,
    /// Secret hasher.
    hasher: PasswordHasher,
}

impl CredentialStore {
    /// Loads the persisted mapping.
    ///
    /// A missing backing store is initialized by persisting an empty
    /// mapping. A backing store that exists but cannot be parsed is an
    /// error; callers must not fall back to an empty store in that case.
    pub fn load(persistence: impl CredentialPersistence + 'static) -> Result<Self, AppError> {
        let persistence: Box<dyn CredentialPersistence> = Box::new(persistence);

        let records = match persistence.load()? {
            Some(records) => records,
            None => {
                let empty = IdentityMap::new();
                persistence.save(&empty)?;
                info!("No credential store found, initialized an empty one");
                empty
            }
        };

        Ok(Self {
            records,
            persistence,
            hasher: PasswordHasher::new(),
        })
    }

    /// Registers a new identity, marked online, and persists the whole mapping.
    ///
    /// The identity match is exact and case-sensitive. If persisting fails
    /// the record is removed again so memory matches what is on disk.
    pub fn register(
        &mut self,
        identity: &str,
        display_name: &str,
        secret: &str,
    ) -> Result<(), RegisterError> {
        if self.records.contains_key(identity) {
            debug!(identity = %identity, "Registration refused, identity exists");
            return Err(RegisterError::AlreadyExists);
        }

        let record = IdentityRecord::new(display_name, self.hasher.hash_password(secret));
        self.records.insert(identity.to_string(), record);

        if let Err(e) = self.persistence.save(&self.records) {
            self.records.remove(identity);
            error!(identity = %identity, error = %e, "Failed to persist registration");
            return Err(RegisterError::Persistence(e));
        }

        info!(identity = %identity, "Identity registered");
        Ok(())
    }

    /// Verifies a secret and marks the identity online.
    ///
    /// Returns the display name. The online flag is not persisted.
    pub fn login(&mut self, identity: &str, secret: &str) -> Result<String, LoginError> {
        let display_name = self.verify(identity, secret)?.to_string();
        if let Some(record) = self.records.get_mut(identity) {
            record.is_online = true;
        }
        Ok(display_name)
    }

    /// Checks a secret without touching the online flag.
    pub fn verify(&self, identity: &str, secret: &str) -> Result<&str, LoginError> {
        let record = self
            .records
            .get(identity)
            .ok_or(LoginError::InvalidCredentials)?;

        if !self.hasher.verify_password(secret, &record.credential_hash) {
            return Err(LoginError::InvalidCredentials);
        }
        Ok(&record.display_name)
    }

    /// Clears the online flag, in memory only. Unknown identities are ignored.
    pub fn mark_offline(&mut self, identity: &str) {
        if let Some(record) = self.records.get_mut(identity) {
            record.is_online = false;
        }
    }

    /// Display names of every identity flagged online.
    pub fn list_online_display_names(&self) -> Vec<String> {
        self.records
            .values()
            .filter(|r| r.is_online)
            .map(|r| r.display_name.clone())
            .collect()
    }

    /// Looks up a record.
    pub fn get(&self, identity: &str) -> Option<&IdentityRecord> {
        self.records.get(identity)
    }

    /// Number of registered identities.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no identity is registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
