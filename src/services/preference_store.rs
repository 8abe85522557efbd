// Clean Reader Preference Store
// Persists reading view preferences (font size, font family, dark mode) as a JSON
// file at the platform-specific config path.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::platform;
use crate::types::errors::PreferenceError;
use crate::types::reader::{ReaderPreferences, Theme};

/// File name of the preference store inside its directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Trait defining the preference store interface.
pub trait PreferenceStoreTrait {
    fn load(&mut self) -> Result<ReaderPreferences, PreferenceError>;
    fn save(&self) -> Result<(), PreferenceError>;
    fn get_preferences(&self) -> &ReaderPreferences;
    fn set_preferences(&mut self, prefs: ReaderPreferences) -> Result<(), PreferenceError>;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), PreferenceError>;
    fn reset(&mut self) -> Result<(), PreferenceError>;
    fn get_path(&self) -> &str;
}

/// Preference store backed by a JSON file on disk.
pub struct PreferenceStore {
    path: String,
    preferences: ReaderPreferences,
}

impl PreferenceStore {
    /// Creates a new PreferenceStore.
    ///
    /// If `path_override` is `Some`, that file is used. Otherwise the file lives in
    /// `$CLEAN_READER_DATA_DIR` when set, or in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let path = match path_override {
            Some(p) => p,
            None => {
                let dir = match std::env::var("CLEAN_READER_DATA_DIR") {
                    Ok(dir) if !dir.is_empty() => std::path::PathBuf::from(dir),
                    _ => platform::get_config_dir(),
                };
                dir.join(PREFERENCES_FILE).to_string_lossy().to_string()
            }
        };

        Self {
            path,
            preferences: ReaderPreferences::default(),
        }
    }

    /// Maps the popup's legacy keys onto store keys and values.
    fn normalize(key: &str, value: Value) -> Result<(&'static str, Value), PreferenceError> {
        match key {
            "fontSize" => Ok(("fontSize", value)),
            "fontFamily" | "font" => Ok(("fontFamily", value)),
            "darkMode" => Ok(("darkMode", value)),
            "theme" => {
                let name = value.as_str().ok_or_else(|| {
                    PreferenceError::InvalidValue(format!("theme must be a string, got {}", value))
                })?;
                let theme = Theme::parse(name).ok_or_else(|| {
                    PreferenceError::InvalidValue(format!("Unknown theme '{}'", name))
                })?;
                Ok(("darkMode", Value::Bool(theme.is_dark())))
            }
            "" => Err(PreferenceError::InvalidKey("Key cannot be empty".to_string())),
            other => Err(PreferenceError::InvalidKey(format!(
                "Key '{}' not found in preferences",
                other
            ))),
        }
    }
}

impl PreferenceStoreTrait for PreferenceStore {
    /// Loads preferences from the JSON file.
    ///
    /// A missing file yields defaults; a malformed one is a serialization error.
    fn load(&mut self) -> Result<ReaderPreferences, PreferenceError> {
        let path = Path::new(&self.path);

        if !path.exists() {
            self.preferences = ReaderPreferences::default();
            return Ok(self.preferences.clone());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            PreferenceError::IoError(format!("Failed to read preference file: {}", e))
        })?;

        let mut prefs: ReaderPreferences = serde_json::from_str(&content).map_err(|e| {
            PreferenceError::SerializationError(format!("Failed to parse preference file: {}", e))
        })?;
        if !ReaderPreferences::is_valid_font_size(prefs.font_size_px) {
            prefs.font_size_px = ReaderPreferences::default().font_size_px;
        }

        self.preferences = prefs;
        Ok(self.preferences.clone())
    }

    /// Writes the current preferences, creating parent directories as needed.
    fn save(&self) -> Result<(), PreferenceError> {
        let path = Path::new(&self.path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PreferenceError::IoError(format!("Failed to create preference directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.preferences).map_err(|e| {
            PreferenceError::SerializationError(format!("Failed to serialize preferences: {}", e))
        })?;

        fs::write(path, json).map_err(|e| {
            PreferenceError::IoError(format!("Failed to write preference file: {}", e))
        })?;

        Ok(())
    }

    fn get_preferences(&self) -> &ReaderPreferences {
        &self.preferences
    }

    /// Replaces all preferences and saves them.
    fn set_preferences(&mut self, prefs: ReaderPreferences) -> Result<(), PreferenceError> {
        if !ReaderPreferences::is_valid_font_size(prefs.font_size_px) {
            return Err(PreferenceError::InvalidValue(format!(
                "Font size {}px is outside the accepted range",
                prefs.font_size_px
            )));
        }
        self.preferences = prefs;
        self.save()
    }

    /// Updates a single preference by store key and saves to disk.
    ///
    /// Accepts `fontSize`, `fontFamily`, `darkMode`, and the popup's `font`
    /// (family name) and `theme` (`"light"` / `"dark"`). The file is re-read
    /// first so keys written by another store on the same path survive.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), PreferenceError> {
        let (key, value) = Self::normalize(key, value)?;
        if Path::new(&self.path).exists() {
            self.load()?;
        }

        let mut json_value = serde_json::to_value(&self.preferences).map_err(|e| {
            PreferenceError::SerializationError(format!("Failed to serialize preferences: {}", e))
        })?;
        match json_value.as_object_mut() {
            Some(map) => {
                map.insert(key.to_string(), value);
            }
            None => {
                return Err(PreferenceError::SerializationError(
                    "Preferences did not serialize to an object".to_string(),
                ))
            }
        }

        // Deserialize back to validate the value's type
        let updated: ReaderPreferences = serde_json::from_value(json_value).map_err(|e| {
            PreferenceError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.set_preferences(updated)
    }

    /// Resets to defaults and saves.
    fn reset(&mut self) -> Result<(), PreferenceError> {
        self.preferences = ReaderPreferences::default();
        self.save()
    }

    fn get_path(&self) -> &str {
        &self.path
    }
}
