// Clean Reader platform paths for Linux
// Config: ~/.config/clean-reader

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for Clean Reader on Linux.
/// Uses `$XDG_CONFIG_HOME/clean-reader` if set, otherwise `~/.config/clean-reader`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("clean-reader"),
        _ => {
            let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
            PathBuf::from(home).join(".config").join("clean-reader")
        }
    }
}
