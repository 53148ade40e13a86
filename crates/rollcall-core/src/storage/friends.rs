//! Tracked accounts storage
//!
//! A friend entry carries its own roll/password so its percentage can be
//! fetched independently of the primary session. Stored passwords are
//! base64-obfuscated - a reversible encoding kept for compatibility with
//! existing files, not secret protection.

use std::fs;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::paths;

use super::write_json_atomic;

/// A peer tracked on the friends view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedAccount {
    pub name: String,
    pub roll: String,
    /// Obfuscated, see [`obfuscate`]
    pub password: String,
}

impl TrackedAccount {
    /// Decode this account's stored password
    pub fn secret(&self) -> String {
        deobfuscate(&self.password)
    }
}

/// Reversible text encoding for stored friend passwords: base64 over the
/// UTF-8 bytes, total over arbitrary Unicode input
pub fn obfuscate(secret: &str) -> String {
    BASE64.encode(secret.as_bytes())
}

/// Inverse of [`obfuscate`]. Malformed input is returned unchanged so a
/// corrupted entry degrades to a wrong password instead of breaking
/// enumeration.
pub fn deobfuscate(encoded: &str) -> String {
    BASE64
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| encoded.to_string())
}

/// Insertion-ordered list of tracked accounts, unique by roll
pub struct FriendRegistry {
    path: PathBuf,
}

impl FriendRegistry {
    /// Registry at the default location (`~/.rollcall/friends.json`)
    pub fn new() -> Self {
        Self::at_path(paths::friends_file())
    }

    /// Registry at a specific path
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// All tracked accounts, in the order they were added
    pub fn list(&self) -> Result<Vec<TrackedAccount>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        let accounts: Vec<TrackedAccount> = serde_json::from_str(&contents)?;
        Ok(accounts)
    }

    /// Track a new account. Fails with [`StoreError::DuplicateAccount`]
    /// when the roll is already present.
    pub fn add(&self, name: &str, roll: &str, secret: &str) -> Result<TrackedAccount, StoreError> {
        let mut accounts = self.list()?;
        if accounts.iter().any(|a| a.roll == roll) {
            return Err(StoreError::DuplicateAccount(roll.to_string()));
        }
        let account = TrackedAccount {
            name: name.to_string(),
            roll: roll.to_string(),
            password: obfuscate(secret),
        };
        accounts.push(account.clone());
        write_json_atomic(&self.path, &accounts)?;
        debug!(roll = %roll, count = accounts.len(), "Friend added");
        Ok(account)
    }

    /// Stop tracking a roll. Returns whether an entry was removed.
    pub fn remove(&self, roll: &str) -> Result<bool, StoreError> {
        let mut accounts = self.list()?;
        let before = accounts.len();
        accounts.retain(|a| a.roll != roll);
        if accounts.len() == before {
            return Ok(false);
        }
        write_json_atomic(&self.path, &accounts)?;
        debug!(roll = %roll, "Friend removed");
        Ok(true)
    }
}

impl Default for FriendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_in(dir: &tempfile::TempDir) -> FriendRegistry {
        FriendRegistry::at_path(dir.path().join("friends.json"))
    }

    #[test]
    fn test_obfuscate_roundtrip() {
        for secret in ["hunter2", "", "pässwörd", "🙂 non-bmp ∑", "a b\tc\n"] {
            assert_eq!(deobfuscate(&obfuscate(secret)), secret);
        }
    }

    #[test]
    fn test_deobfuscate_malformed_returns_input() {
        assert_eq!(deobfuscate("not base64!"), "not base64!");
        // Valid base64 of non-UTF-8 bytes also passes through unchanged
        let bad_utf8 = BASE64.encode([0xff, 0xfe]);
        assert_eq!(deobfuscate(&bad_utf8), bad_utf8);
    }

    #[test]
    fn test_add_and_list_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(&dir);
        registry.add("Asha", "21BCS001", "pw1").unwrap();
        registry.add("Ravi", "21BCS002", "pw2").unwrap();
        registry.add("Meena", "21BCS003", "pw3").unwrap();

        let accounts = registry.list().unwrap();
        let rolls: Vec<&str> = accounts.iter().map(|a| a.roll.as_str()).collect();
        assert_eq!(rolls, ["21BCS001", "21BCS002", "21BCS003"]);
        assert_eq!(accounts[1].secret(), "pw2");
    }

    #[test]
    fn test_duplicate_roll_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(&dir);
        registry.add("Asha", "21BCS001", "pw1").unwrap();

        let err = registry.add("Asha again", "21BCS001", "pw2").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateAccount(roll) if roll == "21BCS001"));

        // Exactly one entry survives, with the original secret
        let accounts = registry.list().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].secret(), "pw1");
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(&dir);
        registry.add("Asha", "21BCS001", "pw1").unwrap();

        assert!(registry.remove("21BCS001").unwrap());
        assert!(!registry.remove("21BCS001").unwrap());
        assert!(registry.list().unwrap().is_empty());
    }
}
