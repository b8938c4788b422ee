//! Identity records and the credential store.

pub mod credential;
pub mod error;
pub mod persistence;
pub mod record;

pub use credential::CredentialStore;
pub use error::{LoginError, RegisterError};
pub use persistence::{CredentialPersistence, IdentityMap, JsonFilePersistence, MemoryPersistence};
pub use record::IdentityRecord;
