//! Platform-specific directory utilities
//!
//! Provides consistent directory paths across different operating systems,
//! following platform conventions for data directories.

use std::path::PathBuf;

/// Environment variable overriding the save directory.
pub const SAVE_DATA_DIR_ENV: &str = "SAVE_DATA_DIR";

/// Get the directory holding saved combat sessions
///
/// `SAVE_DATA_DIR` wins when set. Otherwise follows platform conventions:
/// - macOS: `~/Library/Application Support/combat/sessions`
/// - Linux: `~/.local/share/combat/sessions` (or `$XDG_DATA_HOME/combat/sessions`)
/// - Windows: `%APPDATA%\combat\sessions`
/// - Fallback: `./save_data/sessions`
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(SAVE_DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("", "", "combat")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
        .join("sessions")
}
