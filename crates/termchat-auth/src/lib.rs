//! # termchat-auth
//!
//! Credentials for the TermChat relay.
//!
//! ## Modules
//!
//! - `password`: one-way secret hashing
//! - `store`: identity records, the credential store, and its persistence backends

pub mod password;
pub mod store;

pub use password::PasswordHasher;
pub use store::{
    CredentialStore, IdentityRecord, JsonFilePersistence, LoginError, MemoryPersistence,
    RegisterError,
};
