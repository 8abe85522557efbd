// Clean Reader platform abstraction
// Provides the platform-specific preference directory and the viewer's locale.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::path::PathBuf;

use chrono::Locale;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Returns the platform-specific configuration directory for Clean Reader.
///
/// - **Linux**: `~/.config/clean-reader` (or `$XDG_CONFIG_HOME/clean-reader`)
/// - **macOS**: `~/Library/Application Support/CleanReader`
/// - **Windows**: `%APPDATA%/CleanReader`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        PathBuf::from(".clean-reader")
    }
}

/// Returns the locale dates are shown in.
///
/// Reads `LC_ALL`, then `LC_TIME`, then `LANG`; falls back to `en_US`.
pub fn detect_viewer_locale() -> Locale {
    ["LC_ALL", "LC_TIME", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|value| parse_locale(&value))
        .unwrap_or(Locale::en_US)
}

/// Parses a POSIX or BCP 47 locale name such as `de_DE.UTF-8` or `fr-FR`.
pub fn parse_locale(raw: &str) -> Option<Locale> {
    let name = raw.split(['.', '@']).next()?.trim().replace('-', "_");
    if name.is_empty() || name == "C" || name == "POSIX" {
        return None;
    }
    Locale::try_from(name.as_str()).ok()
}
