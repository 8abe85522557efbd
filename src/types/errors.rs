use thiserror::Error;

// === PreferenceError ===

/// Errors related to reader preference persistence.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// An I/O error occurred while reading or writing the preference file.
    #[error("Preference I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize preferences.
    #[error("Preference serialization error: {0}")]
    SerializationError(String),
    /// The provided preference key is not known.
    #[error("Invalid preference key: {0}")]
    InvalidKey(String),
    /// The provided preference value is invalid.
    #[error("Invalid preference value: {0}")]
    InvalidValue(String),
}

// === RulesError ===

/// Errors related to loading or compiling extraction rules.
#[derive(Debug, Error)]
pub enum RulesError {
    /// A selector in the rule tables could not be parsed.
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
    /// The rules file could not be read.
    #[error("Rules I/O error: {0}")]
    IoError(String),
    /// The rules file is not valid JSON for `ExtractionRules`.
    #[error("Rules serialization error: {0}")]
    SerializationError(String),
}

// === PageError ===

/// Errors related to the hosted page.
#[derive(Debug, Error)]
pub enum PageError {
    /// No document has been loaded into the host yet.
    #[error("No page loaded")]
    NotLoaded,
}
