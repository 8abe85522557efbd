//! Main-Content Locator.
//!
//! Picks the single element most likely to be the article body. Strategies run
//! in strict priority order and the first one that produces an element wins:
//! selector cascade, paragraph density, div density, largest element, body.

use std::collections::HashMap;

use ego_tree::NodeId;
use scraper::ElementRef;
use serde::Serialize;
use tracing::debug;

use crate::dom::document::{is_rendered, text_len};
use crate::dom::Document;
use crate::services::rules::CompiledRules;

/// Which strategy produced the located element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocateStrategy {
    SelectorCascade,
    ParagraphDensity,
    DivDensity,
    LargestElement,
    Body,
}

/// The located article root and how it was found.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub element: ElementRef<'a>,
    pub strategy: LocateStrategy,
}

/// An ancestor credited by the paragraph-density fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub node: NodeId,
    pub paragraphs: usize,
    pub text_length: usize,
}

impl Candidate {
    /// `paragraphs * weight + text_length / divisor`.
    pub fn score(&self, rules: &CompiledRules) -> f64 {
        self.paragraphs as f64 * rules.rules.paragraph_weight
            + self.text_length as f64 / rules.rules.text_length_divisor
    }
}

/// Locates the article root of a document.
pub struct MainContentLocator<'r> {
    rules: &'r CompiledRules,
}

impl<'r> MainContentLocator<'r> {
    pub fn new(rules: &'r CompiledRules) -> Self {
        Self { rules }
    }

    /// Returns the article root; falls back to the body, so it never fails.
    pub fn locate<'a>(&self, doc: &'a Document) -> ElementRef<'a> {
        self.locate_with_strategy(doc).element
    }

    pub fn locate_with_strategy<'a>(&self, doc: &'a Document) -> Located<'a> {
        let located = self
            .by_selector_cascade(doc)
            .map(|el| (el, LocateStrategy::SelectorCascade))
            .or_else(|| {
                self.by_paragraph_density(doc)
                    .map(|el| (el, LocateStrategy::ParagraphDensity))
            })
            .or_else(|| self.by_div_density(doc).map(|el| (el, LocateStrategy::DivDensity)))
            .or_else(|| {
                self.by_largest_element(doc)
                    .map(|el| (el, LocateStrategy::LargestElement))
            })
            .unwrap_or_else(|| (doc.body(), LocateStrategy::Body));

        debug!(
            strategy = ?located.1,
            tag = located.0.value().name(),
            "located main content"
        );
        Located {
            element: located.0,
            strategy: located.1,
        }
    }

    /// First match, across the ordered selectors, whose text clears the threshold.
    fn by_selector_cascade<'a>(&self, doc: &'a Document) -> Option<ElementRef<'a>> {
        let min = self.rules.rules.content_min_chars;
        self.rules
            .content
            .iter()
            .find_map(|selector| doc.html().select(selector).find(|el| text_len(*el) > min))
    }

    /// Ancestor with the best paragraph score; ties keep the first found.
    fn by_paragraph_density<'a>(&self, doc: &'a Document) -> Option<ElementRef<'a>> {
        let candidates = self.paragraph_candidates(doc);
        let mut best: Option<(&Candidate, f64)> = None;
        for candidate in &candidates {
            let score = candidate.score(self.rules);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((candidate, score));
            }
        }
        let (winner, score) = best?;
        debug!(
            paragraphs = winner.paragraphs,
            text_length = winner.text_length,
            score,
            candidates = candidates.len(),
            "paragraph density winner"
        );
        doc.element(winner.node)
    }

    /// Aggregates qualifying paragraphs into their ancestors, in first-seen order.
    pub fn paragraph_candidates(&self, doc: &Document) -> Vec<Candidate> {
        let rules = &self.rules.rules;
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut index: HashMap<NodeId, usize> = HashMap::new();

        for paragraph in doc.html().select(&self.rules.paragraph) {
            let length = text_len(paragraph);
            if length < rules.paragraph_min_chars || !is_rendered(paragraph) {
                continue;
            }
            let ancestors = paragraph
                .ancestors()
                .filter_map(ElementRef::wrap)
                .take_while(|el| !matches!(el.value().name(), "body" | "html"))
                .take(rules.ancestor_depth);
            for ancestor in ancestors {
                let slot = *index.entry(ancestor.id()).or_insert_with(|| {
                    candidates.push(Candidate {
                        node: ancestor.id(),
                        paragraphs: 0,
                        text_length: 0,
                    });
                    candidates.len() - 1
                });
                candidates[slot].paragraphs += 1;
                candidates[slot].text_length += length;
            }
        }
        candidates
    }

    /// Longest visible div that is not a layout shell.
    fn by_div_density<'a>(&self, doc: &'a Document) -> Option<ElementRef<'a>> {
        let rules = &self.rules.rules;
        let mut divs: Vec<(ElementRef<'a>, usize)> = doc
            .html()
            .select(&self.rules.div)
            .filter_map(|div| {
                let length = text_len(div);
                if length < rules.div_min_chars || !is_rendered(div) {
                    return None;
                }
                let nested = div.select(&self.rules.div).count();
                (nested <= rules.div_max_nested).then_some((div, length))
            })
            .collect();
        // Stable sort keeps document order among equal lengths.
        divs.sort_by(|a, b| b.1.cmp(&a.1));
        divs.first().map(|(div, _)| *div)
    }

    /// Element with the most text, ignoring document furniture.
    fn by_largest_element<'a>(&self, doc: &'a Document) -> Option<ElementRef<'a>> {
        let excluded = &self.rules.rules.largest_element_excluded;
        let mut best: Option<(ElementRef<'a>, usize)> = None;
        for el in doc.elements() {
            if excluded.iter().any(|tag| tag == el.value().name()) {
                continue;
            }
            let length = text_len(el);
            if length > 0 && best.map_or(true, |(_, top)| length > top) {
                best = Some((el, length));
            }
        }
        best.map(|(el, _)| el)
    }
}

/// Locates the article root using the built-in rules.
pub fn locate(doc: &Document) -> ElementRef<'_> {
    MainContentLocator::new(CompiledRules::builtin()).locate(doc)
}
