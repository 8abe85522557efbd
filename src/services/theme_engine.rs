//! Theme Engine: light/dark palettes, font stacks and the reading view stylesheet.

use std::collections::BTreeMap;

use crate::types::reader::{FontFamily, ReaderPreferences};

/// Trait defining the theme engine interface.
pub trait ThemeEngineTrait {
    fn font_stack(&self, family: &FontFamily) -> String;
    fn css_variables(&self, dark_mode: bool) -> BTreeMap<String, String>;
    fn container_style(&self, prefs: &ReaderPreferences) -> String;
    fn content_style(&self, prefs: &ReaderPreferences) -> String;
    fn stylesheet(&self) -> String;
}

/// Dark reading palette.
struct DarkPalette;
impl DarkPalette {
    const BACKGROUND: &'static str = "#0d1117";
    const SURFACE: &'static str = "#161b22";
    const TEXT: &'static str = "#c9d1d9";
    const TEXT_MUTED: &'static str = "#8b949e";
    const BORDER: &'static str = "#30363d";
    const LINK: &'static str = "#58a6ff";
}

/// Light reading palette.
struct LightPalette;
impl LightPalette {
    const BACKGROUND: &'static str = "#ffffff";
    const SURFACE: &'static str = "#f6f8fa";
    const TEXT: &'static str = "#24292f";
    const TEXT_MUTED: &'static str = "#57606a";
    const BORDER: &'static str = "#d0d7de";
    const LINK: &'static str = "#0969da";
}

/// Builds reading view styling from preferences.
pub struct ThemeEngine {
    line_height: f32,
    max_width_px: u32,
}

impl ThemeEngine {
    pub fn new() -> Self {
        Self {
            line_height: 1.6,
            max_width_px: 680,
        }
    }

    fn build_variables(
        background: &str,
        surface: &str,
        text: &str,
        text_muted: &str,
        border: &str,
        link: &str,
    ) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        vars.insert("--cr-background".into(), background.into());
        vars.insert("--cr-surface".into(), surface.into());
        vars.insert("--cr-text".into(), text.into());
        vars.insert("--cr-text-muted".into(), text_muted.into());
        vars.insert("--cr-border".into(), border.into());
        vars.insert("--cr-link".into(), link.into());
        vars
    }
}

impl Default for ThemeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeEngineTrait for ThemeEngine {
    /// CSS `font-family` value for a family choice. Custom names are quoted
    /// and fall back to serif.
    fn font_stack(&self, family: &FontFamily) -> String {
        match family {
            FontFamily::Serif => "Georgia, 'Times New Roman', serif".to_string(),
            FontFamily::SansSerif => {
                "-apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif"
                    .to_string()
            }
            FontFamily::Monospace => "'SF Mono', 'Fira Code', Menlo, Consolas, monospace".to_string(),
            FontFamily::Custom(name) => {
                let cleaned: String = name
                    .chars()
                    .filter(|c| !matches!(c, '\'' | '"' | ';' | '{' | '}' | '<' | '>'))
                    .collect();
                format!("'{}', serif", cleaned.trim())
            }
        }
    }

    fn css_variables(&self, dark_mode: bool) -> BTreeMap<String, String> {
        if dark_mode {
            Self::build_variables(
                DarkPalette::BACKGROUND,
                DarkPalette::SURFACE,
                DarkPalette::TEXT,
                DarkPalette::TEXT_MUTED,
                DarkPalette::BORDER,
                DarkPalette::LINK,
            )
        } else {
            Self::build_variables(
                LightPalette::BACKGROUND,
                LightPalette::SURFACE,
                LightPalette::TEXT,
                LightPalette::TEXT_MUTED,
                LightPalette::BORDER,
                LightPalette::LINK,
            )
        }
    }

    /// Inline style for the container: palette variables and font family.
    fn container_style(&self, prefs: &ReaderPreferences) -> String {
        let mut style: String = self
            .css_variables(prefs.dark_mode)
            .iter()
            .map(|(name, value)| format!("{}: {}; ", name, value))
            .collect();
        style.push_str(&format!(
            "font-family: {}; max-width: {}px;",
            self.font_stack(&prefs.font_family),
            self.max_width_px
        ));
        style
    }

    /// Inline style for the content block: font size and line height.
    fn content_style(&self, prefs: &ReaderPreferences) -> String {
        format!(
            "font-size: {}px; line-height: {};",
            prefs.font_size_px, self.line_height
        )
    }

    fn stylesheet(&self) -> String {
        r#".clean-reader-container { margin: 0 auto; padding: 2em; background: var(--cr-background); color: var(--cr-text); }
.clean-reader-container a { color: var(--cr-link); }
.clean-reader-title { font-size: 1.8em; margin-bottom: 0.5em; }
.clean-reader-meta { color: var(--cr-text-muted); margin-bottom: 2em; display: flex; flex-wrap: wrap; gap: 1em; }
.clean-reader-figure { margin: 1.5em 0; text-align: center; }
.clean-reader-image { max-width: 100%; height: auto; }
.clean-reader-figure figcaption { color: var(--cr-text-muted); font-size: 0.9em; }
.clean-reader-table-wrapper { overflow-x: auto; margin: 1.5em 0; }
.clean-reader-content pre { background: var(--cr-surface); padding: 1em; overflow-x: auto; }
.clean-reader-content blockquote { border-left: 4px solid var(--cr-border); margin-left: 0; padding-left: 1em; }
.clean-reader-controls { position: fixed; top: 1em; right: 1em; display: flex; gap: 0.5em; }
.clean-reader-btn { background: var(--cr-surface); color: var(--cr-text); border: 1px solid var(--cr-border); border-radius: 6px; padding: 0.3em 0.8em; cursor: pointer; }"#
            .to_string()
    }
}
