//! Parsed page snapshot and the element queries the heuristics rely on.
//!
//! Text length, visibility and image size are answered from the markup alone:
//! there is no style engine, so "hidden" means the `hidden` attribute or an
//! inline `display: none` / `visibility: hidden`.

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

/// A parsed, read-only snapshot of a page.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full HTML document.
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// The `<html>` element.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// The `<body>` element, or the root element for documents without one.
    pub fn body(&self) -> ElementRef<'_> {
        self.root()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
            .unwrap_or_else(|| self.root())
    }

    /// Looks up an element by its arena handle.
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    /// Returns the first element matching `selector` in document order.
    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    /// Text of the `<title>` element, trimmed; `None` when missing or blank.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.select_first(&selector)
            .map(|el| collapse_whitespace(&text_of(el)))
            .filter(|t| !t.is_empty())
    }

    /// Iterates every element of the document in document order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.root().descendants().filter_map(ElementRef::wrap)
    }
}

/// Concatenated text content of an element and its descendants.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Trimmed text content of an element.
pub fn trimmed_text(el: ElementRef<'_>) -> String {
    text_of(el).trim().to_string()
}

/// Length in characters of the trimmed text content.
pub fn text_len(el: ElementRef<'_>) -> usize {
    text_of(el).trim().chars().count()
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns true if the element itself is marked hidden.
pub fn is_hidden(el: ElementRef<'_>) -> bool {
    let value = el.value();
    if value.attr("hidden").is_some() {
        return true;
    }
    match value.attr("style") {
        Some(style) => {
            let decls = parse_inline_style(style);
            decls.iter().any(|(prop, val)| {
                (prop == "display" && val == "none")
                    || (prop == "visibility" && (val == "hidden" || val == "collapse"))
            })
        }
        None => false,
    }
}

/// Returns true if neither the element nor any of its ancestors is hidden.
pub fn is_rendered(el: ElementRef<'_>) -> bool {
    if is_hidden(el) {
        return false;
    }
    !el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(is_hidden)
}

/// Declared size of an image, from attributes or inline style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageSize {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageSize {
    /// Reads the size of an `<img>`; inline style wins over attributes.
    pub fn of(el: ElementRef<'_>) -> Self {
        let value = el.value();
        let mut size = ImageSize {
            width: value.attr("width").and_then(parse_pixels),
            height: value.attr("height").and_then(parse_pixels),
        };
        if let Some(style) = value.attr("style") {
            for (prop, val) in parse_inline_style(style) {
                match prop.as_str() {
                    "width" => size.width = parse_pixels(&val).or(size.width),
                    "height" => size.height = parse_pixels(&val).or(size.height),
                    _ => {}
                }
            }
        }
        size
    }

    /// True if either known dimension is below `min_px`.
    pub fn is_smaller_than(&self, min_px: u32) -> bool {
        self.width.is_some_and(|w| w < min_px) || self.height.is_some_and(|h| h < min_px)
    }
}

/// Parses `"120"`, `"120px"` or `"120.5px"` into whole pixels.
fn parse_pixels(raw: &str) -> Option<u32> {
    let raw = raw.trim().to_ascii_lowercase();
    let number = raw.strip_suffix("px").unwrap_or(&raw).trim();
    let parsed: f64 = number.parse().ok()?;
    if parsed.is_finite() && parsed >= 0.0 {
        Some(parsed as u32)
    } else {
        None
    }
}

/// Splits an inline `style` attribute into lowercase `(property, value)` pairs.
fn parse_inline_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, val) = decl.split_once(':')?;
            let val = val.trim().trim_end_matches("!important").trim();
            Some((prop.trim().to_ascii_lowercase(), val.to_ascii_lowercase()))
        })
        .collect()
}
