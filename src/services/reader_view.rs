//! Reader View for Clean Reader.
//!
//! Swaps a page's body for a distraction-free reading view and back. The view
//! owns at most one [`ReaderSession`]; while it exists the view is active and
//! holds the exact body markup to restore.

use chrono::Locale;
use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::{Html, Selector};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::dom::document::{collapse_whitespace, text_of, trimmed_text};
use crate::dom::{Document, PageHost};
use crate::services::locator::{LocateStrategy, MainContentLocator};
use crate::services::metadata::{format_date, MetadataExtractor};
use crate::services::preference_store::PreferenceStoreTrait;
use crate::services::rules::CompiledRules;
use crate::services::sanitizer::ContentSanitizer;
use crate::services::theme_engine::{ThemeEngine, ThemeEngineTrait};
use crate::types::content::{ContentElement, ContentFragment, Metadata};
use crate::types::messages::{ContentMessage, ContentResponse, ResponseStatus, SettingsDelta};
use crate::types::reader::{FontFamily, ReaderPreferences, Theme};

/// Words per minute used for the reading time estimate.
const WORDS_PER_MINUTE: f64 = 200.0;

/// Trait defining reader view operations.
pub trait ReaderViewTrait {
    fn toggle(&mut self, page: &mut dyn PageHost) -> bool;
    fn is_active(&self) -> bool;
    fn update_settings(&mut self, page: &mut dyn PageHost, delta: &SettingsDelta) -> bool;
    fn change_font_size(&mut self, page: &mut dyn PageHost, steps: i32) -> bool;
    fn toggle_theme(&mut self, page: &mut dyn PageHost) -> bool;
    fn exit(&mut self, page: &mut dyn PageHost) -> bool;
    fn handle_message(&mut self, page: &mut dyn PageHost, message: &ContentMessage) -> ContentResponse;
}

/// Everything extracted from a page that the reading view shows.
#[derive(Debug, Clone, Serialize)]
pub struct ReaderLayout {
    pub title: String,
    pub strategy: LocateStrategy,
    pub metadata: Metadata,
    pub fragment: ContentFragment,
    pub reading_time_minutes: u32,
}

/// An active reading view: the captured body and what replaced it.
#[derive(Debug, Clone)]
pub struct ReaderSession {
    pub id: Uuid,
    original_body: String,
    layout: ReaderLayout,
    preferences: ReaderPreferences,
}

impl ReaderSession {
    pub fn layout(&self) -> &ReaderLayout {
        &self.layout
    }

    pub fn preferences(&self) -> &ReaderPreferences {
        &self.preferences
    }

    pub fn original_body(&self) -> &str {
        &self.original_body
    }
}

/// Reader view state machine; `session` is `Some` while active.
pub struct ReaderView<S: PreferenceStoreTrait> {
    rules: CompiledRules,
    store: S,
    theme: ThemeEngine,
    locale: Locale,
    session: Option<ReaderSession>,
}

impl<S: PreferenceStoreTrait> ReaderView<S> {
    pub fn new(store: S, rules: CompiledRules, locale: Locale) -> Self {
        Self {
            rules,
            store,
            theme: ThemeEngine::new(),
            locale,
            session: None,
        }
    }

    /// A reader view with the built-in rules and `en_US` dates.
    pub fn with_store(store: S) -> Self {
        Self::new(store, CompiledRules::builtin().clone(), Locale::en_US)
    }

    pub fn session(&self) -> Option<&ReaderSession> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn rules(&self) -> &CompiledRules {
        &self.rules
    }

    /// Forgets the session without touching the page, as a reload does.
    pub fn reset(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(session = %session.id, "discarding reader session");
        }
    }

    fn enable(&mut self, page: &mut dyn PageHost) {
        let original_body = page.body_html().to_string();
        let doc = page.snapshot();
        let layout = extract_layout(&self.rules, &doc);
        let preferences = match self.store.load() {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!(error = %e, "failed to load reader preferences; using defaults");
                ReaderPreferences::default()
            }
        };

        let session = ReaderSession {
            id: Uuid::new_v4(),
            original_body,
            layout,
            preferences,
        };
        page.replace_body(self.render(&session));
        info!(
            session = %session.id,
            strategy = ?session.layout.strategy,
            blocks = session.layout.fragment.len(),
            "reader mode enabled"
        );
        self.session = Some(session);
    }

    fn disable(&mut self, page: &mut dyn PageHost) {
        if let Some(session) = self.session.take() {
            page.replace_body(session.original_body);
            info!(session = %session.id, "reader mode disabled");
        }
    }

    /// Re-renders the live view from the stored layout.
    fn rerender(&self, page: &mut dyn PageHost) {
        if let Some(session) = &self.session {
            page.replace_body(self.render(session));
        }
    }

    /// Writes one preference; failures are logged and otherwise ignored.
    fn persist(&mut self, key: &str, value: serde_json::Value) {
        if let Err(e) = self.store.set_value(key, value) {
            warn!(key, error = %e, "failed to persist reader preference");
        }
    }

    /// Builds the replacement body markup for a session.
    pub fn render(&self, session: &ReaderSession) -> String {
        let prefs = &session.preferences;
        let layout = &session.layout;

        let mut class = String::from("clean-reader-container");
        if prefs.dark_mode {
            class.push_str(" clean-reader-dark");
        }

        let mut out = String::new();
        out.push_str(&format!(
            "<style class=\"clean-reader-style\">{}</style>",
            self.theme.stylesheet()
        ));
        out.push_str(&format!(
            "<div class=\"{}\" style=\"{}\">",
            class,
            encode_double_quoted_attribute(&self.theme.container_style(prefs))
        ));
        out.push_str(&format!(
            "<h1 class=\"clean-reader-title\">{}</h1>",
            encode_text(&layout.title)
        ));
        out.push_str(&self.render_metadata(layout));
        out.push_str(&format!(
            "<div class=\"clean-reader-content\" style=\"{}\">",
            encode_double_quoted_attribute(&self.theme.content_style(prefs))
        ));
        for element in &layout.fragment {
            out.push_str(&render_element(element));
        }
        out.push_str("</div>");
        out.push_str(CONTROL_PANEL);
        out.push_str("</div>");
        out
    }

    fn render_metadata(&self, layout: &ReaderLayout) -> String {
        let meta = &layout.metadata;
        let mut out = String::from("<div class=\"clean-reader-meta\">");
        if let Some(author) = &meta.author {
            out.push_str(&format!(
                "<span class=\"clean-reader-author\">By {}</span>",
                encode_text(author)
            ));
        }
        if let Some(date) = meta.published {
            out.push_str(&format!(
                "<span class=\"clean-reader-date\">{}</span>",
                encode_text(&format_date(date, self.locale))
            ));
        }
        if !meta.categories.is_empty() {
            let joined = meta.categories.join(", ");
            out.push_str(&format!(
                "<span class=\"clean-reader-categories\">{}</span>",
                encode_text(&joined)
            ));
        }
        out.push_str(&format!(
            "<span class=\"clean-reader-reading-time\">{} min read</span>",
            layout.reading_time_minutes
        ));
        out.push_str("</div>");
        out
    }

    fn preferences_mut(&mut self) -> Option<&mut ReaderPreferences> {
        self.session.as_mut().map(|s| &mut s.preferences)
    }
}

const CONTROL_PANEL: &str = concat!(
    "<div class=\"clean-reader-controls\">",
    "<button class=\"clean-reader-btn\" data-action=\"exit\">Exit Reader Mode</button>",
    "<div class=\"clean-reader-font-controls\">",
    "<button class=\"clean-reader-btn\" data-action=\"font-smaller\">A-</button>",
    "<button class=\"clean-reader-btn\" data-action=\"font-larger\">A+</button>",
    "</div>",
    "<button class=\"clean-reader-btn\" data-action=\"toggle-theme\">Toggle Dark Mode</button>",
    "</div>"
);

fn render_element(element: &ContentElement) -> String {
    match element {
        ContentElement::Heading { level, text } => {
            let level = (*level).clamp(1, 6);
            format!("<h{0}>{1}</h{0}>", level, encode_text(text))
        }
        ContentElement::Paragraph { html }
        | ContentElement::List { html, .. }
        | ContentElement::Blockquote { html }
        | ContentElement::CodeBlock { html } => html.clone(),
        ContentElement::Table { html } => {
            format!("<div class=\"clean-reader-table-wrapper\">{}</div>", html)
        }
        ContentElement::Figure { src, alt, caption } => {
            let mut out = format!(
                "<figure class=\"clean-reader-figure\"><img class=\"clean-reader-image\" src=\"{}\" alt=\"{}\">",
                encode_double_quoted_attribute(src),
                encode_double_quoted_attribute(alt.as_deref().unwrap_or(""))
            );
            if let Some(caption) = caption {
                out.push_str(&format!("<figcaption>{}</figcaption>", encode_text(caption)));
            }
            out.push_str("</figure>");
            out
        }
    }
}

impl<S: PreferenceStoreTrait> ReaderViewTrait for ReaderView<S> {
    /// Enables the view when inactive, restores the page when active.
    /// Returns whether the view is active afterwards.
    fn toggle(&mut self, page: &mut dyn PageHost) -> bool {
        if self.session.is_some() {
            self.disable(page);
        } else {
            self.enable(page);
        }
        self.is_active()
    }

    fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Applies a popup settings change to the live view. Inactive views ignore it.
    fn update_settings(&mut self, page: &mut dyn PageHost, delta: &SettingsDelta) -> bool {
        let Some(prefs) = self.preferences_mut() else {
            debug!("ignoring settings update while inactive");
            return false;
        };
        if delta.is_empty() {
            debug!("ignoring empty settings update");
            return false;
        }
        if let Some(theme) = &delta.theme {
            match Theme::parse(theme) {
                Some(theme) => prefs.dark_mode = theme.is_dark(),
                None => warn!(theme = %theme, "ignoring unknown theme"),
            }
        }
        if let Some(font) = &delta.font {
            prefs.font_family = FontFamily::from(font.as_str());
        }
        if let Some(size) = delta.font_size {
            if ReaderPreferences::is_valid_font_size(size) {
                prefs.font_size_px = size;
            } else {
                warn!(size, "ignoring out-of-range font size");
            }
        }
        self.rerender(page);
        true
    }

    /// "A+" / "A-": moves the font size by `steps` and persists it.
    /// Returns false when inactive or when the change would leave the range.
    fn change_font_size(&mut self, page: &mut dyn PageHost, steps: i32) -> bool {
        let Some(prefs) = self.preferences_mut() else {
            return false;
        };
        if !prefs.step_font_size(steps) {
            return false;
        }
        let size = prefs.font_size_px;
        self.rerender(page);
        self.persist("fontSize", json!(size));
        true
    }

    /// Flips dark mode on the live view and persists it.
    fn toggle_theme(&mut self, page: &mut dyn PageHost) -> bool {
        let Some(prefs) = self.preferences_mut() else {
            return false;
        };
        prefs.dark_mode = !prefs.dark_mode;
        let dark = prefs.dark_mode;
        self.rerender(page);
        self.persist("darkMode", json!(dark));
        true
    }

    /// The panel's exit button.
    fn exit(&mut self, page: &mut dyn PageHost) -> bool {
        let was_active = self.is_active();
        self.disable(page);
        was_active
    }

    fn handle_message(&mut self, page: &mut dyn PageHost, message: &ContentMessage) -> ContentResponse {
        match message {
            ContentMessage::ToggleReader => ContentResponse::Toggled {
                status: ResponseStatus::Success,
                reader_mode_active: self.toggle(page),
            },
            ContentMessage::GetStatus => ContentResponse::Status {
                reader_mode_active: self.is_active(),
            },
            ContentMessage::UpdateSettings { settings } => {
                let status = if self.update_settings(page, settings) {
                    ResponseStatus::Success
                } else {
                    ResponseStatus::Ignored
                };
                ContentResponse::Ack { status }
            }
        }
    }
}

/// Runs locator, sanitizer and metadata extraction over a snapshot.
pub fn extract_layout(rules: &CompiledRules, doc: &Document) -> ReaderLayout {
    let located = MainContentLocator::new(rules).locate_with_strategy(doc);
    let fragment = ContentSanitizer::new(rules).sanitize(located.element);
    let metadata = MetadataExtractor::new(rules).extract(doc);
    let reading_time_minutes = estimate_read_time(word_count(&fragment));
    ReaderLayout {
        title: page_title(doc),
        strategy: located.strategy,
        metadata,
        fragment,
        reading_time_minutes,
    }
}

/// `<title>`, then `og:title`, then the first `h1`, then "Untitled".
fn page_title(doc: &Document) -> String {
    if let Some(title) = doc.title() {
        return title;
    }
    let lookup = |css: &str, attr: Option<&str>| -> Option<String> {
        let selector = Selector::parse(css).ok()?;
        let el = doc.select_first(&selector)?;
        let value = match attr {
            Some(name) => collapse_whitespace(el.value().attr(name)?),
            None => collapse_whitespace(&trimmed_text(el)),
        };
        (!value.is_empty()).then_some(value)
    };
    lookup("meta[property=\"og:title\"]", Some("content"))
        .or_else(|| lookup("h1", None))
        .unwrap_or_else(|| "Untitled".to_string())
}

/// Estimates reading time at ~200 words per minute, never less than one.
pub fn estimate_read_time(words: usize) -> u32 {
    ((words as f64) / WORDS_PER_MINUTE).ceil().max(1.0) as u32
}

fn word_count(fragment: &ContentFragment) -> usize {
    fragment
        .iter()
        .map(|element| match element {
            ContentElement::Heading { text, .. } => text.split_whitespace().count(),
            ContentElement::Figure { caption, .. } => caption
                .as_deref()
                .map_or(0, |c| c.split_whitespace().count()),
            ContentElement::Paragraph { html }
            | ContentElement::List { html, .. }
            | ContentElement::Blockquote { html }
            | ContentElement::Table { html }
            | ContentElement::CodeBlock { html } => {
                let parsed = Html::parse_fragment(html);
                text_of(parsed.root_element()).split_whitespace().count()
            }
        })
        .sum()
}
