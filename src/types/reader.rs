use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest font size the reading view accepts, in pixels.
pub const MIN_FONT_SIZE_PX: u32 = 12;
/// Largest font size the reading view accepts, in pixels.
pub const MAX_FONT_SIZE_PX: u32 = 32;
/// Pixels added or removed by one "A+" / "A-" press.
pub const FONT_SIZE_STEP_PX: u32 = 2;

/// User-configurable reading view preferences.
///
/// Serialized with the preference store keys `fontSize`, `fontFamily` and `darkMode`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReaderPreferences {
    #[serde(rename = "fontSize", default = "default_font_size")]
    pub font_size_px: u32,
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default)]
    pub dark_mode: bool,
}

fn default_font_size() -> u32 {
    16
}

impl Default for ReaderPreferences {
    fn default() -> Self {
        Self {
            font_size_px: default_font_size(),
            font_family: FontFamily::default(),
            dark_mode: false,
        }
    }
}

impl ReaderPreferences {
    /// Returns true if `size` lies within the accepted font size range.
    pub fn is_valid_font_size(size: u32) -> bool {
        (MIN_FONT_SIZE_PX..=MAX_FONT_SIZE_PX).contains(&size)
    }

    /// Moves the font size by `steps` increments of [`FONT_SIZE_STEP_PX`].
    ///
    /// A change that would leave the accepted range is rejected and the size
    /// stays as it was. Returns whether the size changed.
    pub fn step_font_size(&mut self, steps: i32) -> bool {
        let next = self.font_size_px as i64 + steps as i64 * FONT_SIZE_STEP_PX as i64;
        if next < MIN_FONT_SIZE_PX as i64 || next > MAX_FONT_SIZE_PX as i64 {
            return false;
        }
        self.font_size_px = next as u32;
        steps != 0
    }
}

/// Font family choice for the reading view.
///
/// The three generic families are named; anything else is passed through as a
/// custom CSS family name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum FontFamily {
    #[default]
    Serif,
    SansSerif,
    Monospace,
    Custom(String),
}

impl FontFamily {
    pub fn as_str(&self) -> &str {
        match self {
            FontFamily::Serif => "serif",
            FontFamily::SansSerif => "sans-serif",
            FontFamily::Monospace => "monospace",
            FontFamily::Custom(name) => name,
        }
    }
}

impl From<String> for FontFamily {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "serif" => FontFamily::Serif,
            "sans-serif" | "sans" | "sansserif" => FontFamily::SansSerif,
            "monospace" | "mono" => FontFamily::Monospace,
            _ => FontFamily::Custom(value.trim().to_string()),
        }
    }
}

impl From<&str> for FontFamily {
    fn from(value: &str) -> Self {
        FontFamily::from(value.to_string())
    }
}

impl From<FontFamily> for String {
    fn from(value: FontFamily) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Light or dark reading theme, as named by the popup's theme select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Parses a theme name; unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}
