//! Metadata Extractor: author, publish date and categories.
//!
//! Every lookup walks an ordered selector table and stops at the first usable
//! value. Nothing here fails: an unusable candidate just moves on to the next
//! selector.

use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime};
use scraper::ElementRef;
use tracing::{debug, trace};

use crate::dom::document::{collapse_whitespace, trimmed_text};
use crate::dom::Document;
use crate::services::rules::CompiledRules;
use crate::types::content::Metadata;

/// Date-only layouts tried after the RFC parsers, most specific first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
];

/// Date-time layouts without an offset.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Extracts article metadata from a page snapshot.
pub struct MetadataExtractor<'r> {
    rules: &'r CompiledRules,
}

impl<'r> MetadataExtractor<'r> {
    pub fn new(rules: &'r CompiledRules) -> Self {
        Self { rules }
    }

    pub fn extract(&self, doc: &Document) -> Metadata {
        let metadata = Metadata {
            author: self.author(doc),
            published: self.published(doc),
            categories: self.categories(doc),
        };
        debug!(
            author = metadata.author.is_some(),
            published = metadata.published.is_some(),
            categories = metadata.categories.len(),
            "extracted metadata"
        );
        metadata
    }

    /// First non-empty value from the first match of each author selector.
    pub fn author(&self, doc: &Document) -> Option<String> {
        self.rules.author.iter().find_map(|selector| {
            let el = doc.select_first(selector)?;
            let value = el
                .value()
                .attr("content")
                .map(collapse_whitespace)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| collapse_whitespace(&trimmed_text(el)));
            (!value.is_empty()).then_some(value)
        })
    }

    /// First parseable date from the first match of each date selector.
    pub fn published(&self, doc: &Document) -> Option<NaiveDate> {
        self.rules.date.iter().find_map(|selector| {
            let el = doc.select_first(selector)?;
            let raw = date_source(el)?;
            let parsed = parse_date(&raw);
            if parsed.is_none() {
                trace!(value = %raw, "skipping unparseable date");
            }
            parsed
        })
    }

    /// All values of the first category selector that matches anything.
    pub fn categories(&self, doc: &Document) -> Vec<String> {
        for selector in &self.rules.category {
            let matches: Vec<ElementRef<'_>> = doc.html().select(selector).collect();
            if matches.is_empty() {
                continue;
            }
            return matches
                .into_iter()
                .map(|el| match el.value().attr("content") {
                    Some(content) => collapse_whitespace(content),
                    None => collapse_whitespace(&trimmed_text(el)),
                })
                .filter(|v| !v.is_empty())
                .collect();
        }
        Vec::new()
    }
}

/// `content`, then `datetime`, then the element's text.
fn date_source(el: ElementRef<'_>) -> Option<String> {
    let value = el.value();
    value
        .attr("content")
        .or_else(|| value.attr("datetime"))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| Some(collapse_whitespace(&trimmed_text(el))))
        .filter(|v| !v.is_empty())
}

/// Parses the date formats commonly found in article markup.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Formats a date the way the viewer's locale writes dates.
pub fn format_date(date: NaiveDate, locale: Locale) -> String {
    date.format_localized("%x", locale).to_string()
}

/// Extracts metadata using the built-in rules.
pub fn extract_metadata(doc: &Document) -> Metadata {
    MetadataExtractor::new(CompiledRules::builtin()).extract(doc)
}
