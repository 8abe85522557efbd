// Clean Reader platform paths for macOS
// Config: ~/Library/Application Support/CleanReader

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for Clean Reader on macOS.
/// `~/Library/Application Support/CleanReader`
pub fn get_config_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
        .join("Library")
        .join("Application Support")
        .join("CleanReader")
}
