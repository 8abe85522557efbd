//! App Core for Clean Reader.
//!
//! Holds the loaded page and the reader view that runs on it.

use std::path::Path;

use chrono::Locale;
use tracing::info;

use crate::dom::HtmlPage;
use crate::platform;
use crate::services::preference_store::PreferenceStore;
use crate::services::reader_view::ReaderView;
use crate::services::rules::{CompiledRules, ExtractionRules};
use crate::types::errors::{PageError, RulesError};

/// Environment variable naming a JSON file of extraction rules.
pub const RULES_ENV: &str = "CLEAN_READER_RULES";

/// Central application struct: one page, one reader view.
pub struct App {
    pub page: Option<HtmlPage>,
    pub reader_view: ReaderView<PreferenceStore>,
}

impl App {
    /// Creates a new App.
    ///
    /// `preferences_path` overrides where preferences are stored. Extraction rules
    /// come from `$CLEAN_READER_RULES` when set, otherwise the built-in tables.
    pub fn new(preferences_path: Option<String>) -> Result<Self, RulesError> {
        let rules = match std::env::var(RULES_ENV) {
            Ok(path) if !path.is_empty() => {
                info!(path = %path, "loading extraction rules");
                CompiledRules::compile(&ExtractionRules::load(Path::new(&path))?)?
            }
            _ => CompiledRules::builtin().clone(),
        };
        Ok(Self::with_rules(
            preferences_path,
            rules,
            platform::detect_viewer_locale(),
        ))
    }

    pub fn with_rules(preferences_path: Option<String>, rules: CompiledRules, locale: Locale) -> Self {
        let store = PreferenceStore::new(preferences_path);
        Self {
            page: None,
            reader_view: ReaderView::new(store, rules, locale),
        }
    }

    /// Loads a new page. Any reader session on the previous page is gone.
    pub fn load_page(&mut self, markup: &str) {
        self.reader_view.reset();
        self.page = Some(HtmlPage::from_html(markup));
    }

    pub fn page(&self) -> Result<&HtmlPage, PageError> {
        self.page.as_ref().ok_or(PageError::NotLoaded)
    }

    /// The loaded page together with the reader view, borrowed separately.
    pub fn page_and_view(
        &mut self,
    ) -> Result<(&mut HtmlPage, &mut ReaderView<PreferenceStore>), PageError> {
        match self.page.as_mut() {
            Some(page) => Ok((page, &mut self.reader_view)),
            None => Err(PageError::NotLoaded),
        }
    }
}
