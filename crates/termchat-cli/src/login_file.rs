//! Saved credentials (`login.json`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use termchat_core::error::AppError;
use termchat_core::result::AppResult;

/// Credentials remembered between runs. The password is stored as typed;
/// only its digest goes over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLogin {
    /// Login handle.
    pub username: String,
    /// Password as typed.
    pub password: String,
}

/// What was found at the credentials path.
#[derive(Debug)]
pub enum LoginFileState {
    /// A usable file.
    Found(SavedLogin),
    /// Nothing there.
    Missing,
    /// A file that does not parse.
    Corrupt(AppError),
}

/// Reads the credentials file.
pub fn load(path: &Path) -> LoginFileState {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LoginFileState::Missing,
        Err(e) => return LoginFileState::Corrupt(e.into()),
    };
    match serde_json::from_str(&raw) {
        Ok(saved) => LoginFileState::Found(saved),
        Err(e) => LoginFileState::Corrupt(e.into()),
    }
}

/// Writes the credentials file.
pub fn save(path: &Path, login: &SavedLogin) -> AppResult<()> {
    let json = serde_json::to_string(login)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Deletes the credentials file. A missing file is not an error.
pub fn remove(path: &Path) -> AppResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("login.json");
        let login = SavedLogin {
            username: "alice".into(),
            password: "pw1".into(),
        };

        save(&path, &login).expect("save");
        assert!(matches!(load(&path), LoginFileState::Found(l) if l == login));
    }

    #[test]
    fn test_missing_and_corrupt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("login.json");
        assert!(matches!(load(&path), LoginFileState::Missing));

        std::fs::write(&path, r#"{"username":"alice"}"#).expect("write");
        assert!(matches!(load(&path), LoginFileState::Corrupt(_)));

        remove(&path).expect("remove");
        assert!(!path.exists());
        remove(&path).expect("remove twice");
    }
}
