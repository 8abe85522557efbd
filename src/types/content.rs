use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One allow-listed block of article content.
///
/// Block variants carry the serialized markup of the cleaned element; headings
/// and figures carry only what the reading view needs to rebuild them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentElement {
    Heading { level: u8, text: String },
    Paragraph { html: String },
    List { ordered: bool, html: String },
    Blockquote { html: String },
    Table { html: String },
    Figure {
        src: String,
        alt: Option<String>,
        caption: Option<String>,
    },
    CodeBlock { html: String },
}

impl ContentElement {
    pub fn is_heading(&self) -> bool {
        matches!(self, ContentElement::Heading { .. })
    }
}

/// Ordered sequence of content elements produced by one sanitizer run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentFragment {
    pub elements: Vec<ContentElement>,
}

impl ContentFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: ContentElement) {
        self.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentElement> {
        self.elements.iter()
    }

    pub fn headings(&self) -> impl Iterator<Item = &ContentElement> {
        self.elements.iter().filter(|e| e.is_heading())
    }

    pub fn figures(&self) -> impl Iterator<Item = &ContentElement> {
        self.elements
            .iter()
            .filter(|e| matches!(e, ContentElement::Figure { .. }))
    }
}

impl<'a> IntoIterator for &'a ContentFragment {
    type Item = &'a ContentElement;
    type IntoIter = std::slice::Iter<'a, ContentElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// Article metadata found on the page. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub author: Option<String>,
    pub published: Option<NaiveDate>,
    pub categories: Vec<String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.published.is_none() && self.categories.is_empty()
    }
}
