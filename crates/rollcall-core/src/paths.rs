//! Config directory resolution

use std::path::PathBuf;

use crate::constants;

/// Root config directory (`~/.rollcall`)
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(constants::storage::CONFIG_DIR_NAME)
}

/// Primary session file path
pub fn session_file() -> PathBuf {
    config_dir().join(constants::storage::SESSION_FILE)
}

/// Tracked accounts file path
pub fn friends_file() -> PathBuf {
    config_dir().join(constants::storage::FRIENDS_FILE)
}
