//! Extraction Rules: the selector and threshold tables behind the heuristics.
//!
//! Rules are plain data (`ExtractionRules`) so they can be loaded from JSON and
//! exercised on synthetic fixtures; `CompiledRules` holds the parsed selectors
//! the locator, sanitizer and metadata extractor actually run.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::types::errors::RulesError;

static BUILTIN: LazyLock<CompiledRules> = LazyLock::new(|| {
    CompiledRules::compile(&ExtractionRules::default())
        .expect("built-in extraction rules should compile")
});

/// Selector and threshold tables, in priority order where order matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    /// Candidate roots for the selector cascade, semantic first.
    pub content_selectors: Vec<String>,
    /// A cascade match qualifies when its trimmed text is longer than this.
    pub content_min_chars: usize,
    /// Elements counted by the paragraph-density fallback.
    pub paragraph_selector: String,
    pub paragraph_min_chars: usize,
    /// Ancestor levels credited for each paragraph.
    pub ancestor_depth: usize,
    pub paragraph_weight: f64,
    /// Text length is divided by this before being added to the score.
    pub text_length_divisor: f64,
    pub div_selector: String,
    pub div_min_chars: usize,
    /// Divs wrapping more nested divs than this are treated as layout shells.
    pub div_max_nested: usize,
    /// Element kinds never returned by the largest-element fallback.
    pub largest_element_excluded: Vec<String>,
    /// Boilerplate removed from the candidate before collecting content.
    pub boilerplate_selectors: Vec<String>,
    /// Images narrower or shorter than this are treated as icons.
    pub min_image_px: u32,
    /// Wrappers that carry an image and possibly its caption.
    pub image_container_selectors: Vec<String>,
    /// Caption text elements inside CMS image containers.
    pub cms_caption_selectors: Vec<String>,
    pub author_selectors: Vec<String>,
    pub date_selectors: Vec<String>,
    pub category_selectors: Vec<String>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            content_selectors: strings(&[
                "article",
                "[role=\"main\"]",
                ".post-content",
                ".article-content",
                ".entry-content",
                ".content-body",
                ".story-body",
                ".post-body",
                ".article-body",
                ".td-post-content",
                ".single-post",
                ".blog-post",
                "main",
                "#main-content",
                "#content",
            ]),
            content_min_chars: 200,
            paragraph_selector: "p".to_string(),
            paragraph_min_chars: 30,
            ancestor_depth: 5,
            paragraph_weight: 10.0,
            text_length_divisor: 50.0,
            div_selector: "div".to_string(),
            div_min_chars: 500,
            div_max_nested: 20,
            largest_element_excluded: strings(&[
                "html", "head", "body", "script", "style", "meta", "link", "noscript", "title",
                "template",
            ]),
            boilerplate_selectors: strings(&[
                "script",
                "style",
                "noscript",
                "iframe",
                "nav",
                "header:not(.entry-header):not(.article-header):not(.post-header)",
                "footer",
                "aside",
                "form.comment-form",
                "form#commentform",
                "form[action*=\"comment\"]",
                "form[action*=\"search\"]",
                ".ad",
                ".ads",
                ".advert",
                ".advertisement",
                "[class*=\"ad-slot\"]",
                "[id^=\"google_ads\"]",
                ".social",
                ".social-share",
                ".share",
                ".sharing",
                ".share-buttons",
                "[class*=\"share-\"]",
                ".sidebar",
                "#sidebar",
                ".widget",
                ".comment",
                ".comments",
                "#comments",
                ".related",
                ".related-posts",
                ".newsletter",
                ".search",
                ".search-form",
                "[role=\"search\"]",
                "[role=\"banner\"]",
                "[role=\"navigation\"]",
                "[role=\"complementary\"]",
            ]),
            min_image_px: 50,
            image_container_selectors: strings(&["figure", ".wp-block-image", ".wp-caption"]),
            cms_caption_selectors: strings(&[".wp-caption-text", ".wp-element-caption"]),
            author_selectors: strings(&[
                "meta[name=\"author\"]",
                ".author",
                ".byline",
                "[rel=\"author\"]",
                "[itemprop=\"author\"]",
                "[class*=\"author\"]",
            ]),
            date_selectors: strings(&[
                "meta[property=\"article:published_time\"]",
                "time",
                ".date",
                ".published",
                ".timestamp",
                "[itemprop=\"datePublished\"]",
                "[class*=\"date\"]",
            ]),
            category_selectors: strings(&[
                "meta[property=\"article:section\"]",
                ".post-categories a",
                ".cat-links a",
                "[rel=\"category tag\"]",
                ".categories a",
                ".category",
            ]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ExtractionRules {
    /// Loads rules from a JSON file. Fields missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let content = fs::read_to_string(path)
            .map_err(|e| RulesError::IoError(format!("Failed to read rules file: {}", e)))?;
        serde_json::from_str(&content).map_err(|e| {
            RulesError::SerializationError(format!("Failed to parse rules file: {}", e))
        })
    }
}

/// Rules with every selector parsed.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub rules: ExtractionRules,
    pub content: Vec<Selector>,
    pub paragraph: Selector,
    pub div: Selector,
    pub boilerplate: Vec<Selector>,
    pub image_containers: Vec<Selector>,
    pub cms_captions: Vec<Selector>,
    pub author: Vec<Selector>,
    pub date: Vec<Selector>,
    pub category: Vec<Selector>,
}

impl CompiledRules {
    /// Parses every selector in `rules`; the first invalid one is reported.
    pub fn compile(rules: &ExtractionRules) -> Result<Self, RulesError> {
        Ok(Self {
            content: parse_all(&rules.content_selectors)?,
            paragraph: parse_one(&rules.paragraph_selector)?,
            div: parse_one(&rules.div_selector)?,
            boilerplate: parse_all(&rules.boilerplate_selectors)?,
            image_containers: parse_all(&rules.image_container_selectors)?,
            cms_captions: parse_all(&rules.cms_caption_selectors)?,
            author: parse_all(&rules.author_selectors)?,
            date: parse_all(&rules.date_selectors)?,
            category: parse_all(&rules.category_selectors)?,
            rules: rules.clone(),
        })
    }

    /// The built-in rules, compiled once.
    pub fn builtin() -> &'static CompiledRules {
        &BUILTIN
    }
}

fn parse_one(selector: &str) -> Result<Selector, RulesError> {
    Selector::parse(selector).map_err(|e| RulesError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn parse_all(selectors: &[String]) -> Result<Vec<Selector>, RulesError> {
    selectors.iter().map(|s| parse_one(s)).collect()
}
