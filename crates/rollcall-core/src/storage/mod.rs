//! Persistence layer
//!
//! Two independent JSON files under `~/.rollcall`:
//! - `session.json`: primary credentials + last fetched snapshot
//! - `friends.json`: tracked accounts with obfuscated secrets
//!
//! Writes are atomic (temp file then rename) and each file has a single
//! logical writer per session. The exact file layout is an implementation
//! choice, not a contract other systems depend on.

mod credentials;
mod friends;

pub use credentials::{CachedPayload, CredentialStore, Credentials};
pub use friends::{deobfuscate, obfuscate, FriendRegistry, TrackedAccount};

use std::fs;
use std::path::Path;

use crate::error::StoreError;

/// Atomic JSON write: temp file in the same directory, then rename.
/// On Unix the file is restricted to owner read/write.
pub(crate) fn write_json_atomic<T: serde::Serialize>(
    path: &Path,
    value: &T,
) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let contents = serde_json::to_string_pretty(value)?;
    fs::write(&temp_path, contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(&temp_path) {
            let mut permissions = metadata.permissions();
            permissions.set_mode(0o600);
            let _ = fs::set_permissions(&temp_path, permissions);
        }
    }

    fs::rename(&temp_path, path)?;
    tracing::debug!("Wrote {:?} atomically", path);
    Ok(())
}
