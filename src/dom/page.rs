//! The live page the reading view is swapped into.

use scraper::{Html, Selector};

use super::document::Document;

/// Access to the host page: read its markup, replace its body.
///
/// Body markup is exchanged as a string so a captured body can be put back
/// byte-for-byte.
pub trait PageHost {
    /// Serialized markup of the whole document.
    fn document_html(&self) -> String;
    /// Inner markup of `<body>`.
    fn body_html(&self) -> &str;
    /// Replaces the inner markup of `<body>`.
    fn replace_body(&mut self, body_html: String);

    /// Parses the current document into a snapshot.
    fn snapshot(&self) -> Document {
        Document::parse(&self.document_html())
    }
}

/// An in-memory page: the document head kept as parsed, the body kept as a
/// markup string.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlPage {
    head_html: String,
    body_html: String,
}

impl HtmlPage {
    /// Loads a page from full document markup.
    pub fn from_html(markup: &str) -> Self {
        let parsed = Html::parse_document(markup);
        let inner = |css: &str| {
            Selector::parse(css)
                .ok()
                .and_then(|sel| parsed.select(&sel).next().map(|el| el.inner_html()))
                .unwrap_or_default()
        };
        Self {
            head_html: inner("head"),
            body_html: inner("body"),
        }
    }

    pub fn head_html(&self) -> &str {
        &self.head_html
    }
}

impl PageHost for HtmlPage {
    fn document_html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html><head>{}</head><body>{}</body></html>",
            self.head_html, self.body_html
        )
    }

    fn body_html(&self) -> &str {
        &self.body_html
    }

    fn replace_body(&mut self, body_html: String) {
        self.body_html = body_html;
    }
}
