//! Unit tests for the Main-Content Locator.
//!
//! Each fallback strategy gets a synthetic page that defeats every strategy
//! before it, so the test pins down which one fires and what it returns.

use clean_reader::dom::Document;
use clean_reader::services::locator::{locate, LocateStrategy, MainContentLocator};
use clean_reader::services::rules::{CompiledRules, ExtractionRules};
use rstest::rstest;

/// A sentence long enough to count as a real paragraph.
const SENTENCE: &str = "The quick brown fox jumps over the lazy dog near the riverbank.";

fn paragraphs(count: usize) -> String {
    (0..count).map(|_| format!("<p>{}</p>", SENTENCE)).collect()
}

fn id_of(el: scraper::ElementRef<'_>) -> Option<&str> {
    el.value().attr("id")
}

// ---------------------------------------------------------------------------
// Selector cascade
// ---------------------------------------------------------------------------

#[test]
fn test_article_over_threshold_wins() {
    let html = format!(
        "<html><body><nav>Home About</nav><article id=\"story\">{}</article><footer>c</footer></body></html>",
        paragraphs(4)
    );
    let doc = Document::parse(&html);
    let located = MainContentLocator::new(CompiledRules::builtin()).locate_with_strategy(&doc);

    assert_eq!(located.strategy, LocateStrategy::SelectorCascade);
    assert_eq!(located.element.value().name(), "article");
    assert_eq!(id_of(located.element), Some("story"));
}

#[test]
fn test_short_article_falls_through_to_next_selector() {
    let html = format!(
        "<body><article>Too short</article><main id=\"m\">{}</main></body>",
        paragraphs(5)
    );
    let doc = Document::parse(&html);
    assert_eq!(id_of(locate(&doc)), Some("m"));
}

#[test]
fn test_second_article_is_used_when_first_is_short() {
    let html = format!(
        "<body><article id=\"teaser\">Short teaser</article><article id=\"full\">{}</article></body>",
        paragraphs(4)
    );
    let doc = Document::parse(&html);
    assert_eq!(id_of(locate(&doc)), Some("full"));
}

// ---------------------------------------------------------------------------
// Paragraph density
// ---------------------------------------------------------------------------

#[test]
fn test_common_parent_of_paragraphs_wins() {
    let html = format!(
        "<body><div id=\"page\"><div id=\"wrap\"><div id=\"story\">{}</div></div></div><div id=\"side\"><p>{}</p></div></body>",
        paragraphs(4),
        SENTENCE
    );
    let doc = Document::parse(&html);
    let located = MainContentLocator::new(CompiledRules::builtin()).locate_with_strategy(&doc);

    assert_eq!(located.strategy, LocateStrategy::ParagraphDensity);
    // #story, #wrap and #page tie; the first-found ancestor is kept.
    assert_eq!(id_of(located.element), Some("story"));
}

#[test]
fn test_denser_section_beats_earlier_sparse_one() {
    let html = format!(
        "<body><div id=\"a\">{}</div><div id=\"b\">{}</div></body>",
        paragraphs(1),
        paragraphs(3)
    );
    let doc = Document::parse(&html);
    assert_eq!(id_of(locate(&doc)), Some("b"));
}

#[test]
fn test_short_and_hidden_paragraphs_do_not_count() {
    let html = format!(
        "<body><div id=\"hidden\" style=\"display: none\">{}</div><div id=\"short\"><p>tiny</p><p>tiny</p></div><div id=\"real\"><p>{}</p></div></body>",
        paragraphs(6),
        SENTENCE
    );
    let doc = Document::parse(&html);
    let locator = MainContentLocator::new(CompiledRules::builtin());
    let candidates = locator.paragraph_candidates(&doc);

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].paragraphs, 1);
    assert_eq!(id_of(locator.locate(&doc)), Some("real"));
}

#[test]
fn test_candidate_ancestors_stop_below_body() {
    let html = format!("<body>{}</body>", paragraphs(3));
    let doc = Document::parse(&html);
    let locator = MainContentLocator::new(CompiledRules::builtin());
    assert!(locator.paragraph_candidates(&doc).is_empty());
}

// ---------------------------------------------------------------------------
// Div density, largest element and body fallbacks
// ---------------------------------------------------------------------------

#[test]
fn test_longest_div_wins_without_paragraphs() {
    let long = "word ".repeat(150);
    let longer = "word ".repeat(200);
    let html = format!(
        "<body><div id=\"one\">{}</div><div id=\"two\">{}</div></body>",
        long, longer
    );
    let doc = Document::parse(&html);
    let located = MainContentLocator::new(CompiledRules::builtin()).locate_with_strategy(&doc);

    assert_eq!(located.strategy, LocateStrategy::DivDensity);
    assert_eq!(id_of(located.element), Some("two"));
}

#[test]
fn test_layout_shell_divs_are_skipped() {
    let cells: String = (0..25).map(|_| format!("<div>{}</div>", "cell ".repeat(10))).collect();
    let html = format!(
        "<body><div id=\"shell\">{}</div><div id=\"text\">{}</div></body>",
        cells,
        "word ".repeat(120)
    );
    let doc = Document::parse(&html);
    assert_eq!(id_of(locate(&doc)), Some("text"));
}

#[test]
fn test_largest_element_fallback() {
    let doc = Document::parse(
        "<body><section id=\"s\"><span>Just a little text</span></section><em>x</em></body>",
    );
    let located = MainContentLocator::new(CompiledRules::builtin()).locate_with_strategy(&doc);

    assert_eq!(located.strategy, LocateStrategy::LargestElement);
    assert_eq!(id_of(located.element), Some("s"));
}

#[test]
fn test_empty_page_falls_back_to_body() {
    let doc = Document::parse("<html><head><title>Empty</title></head><body></body></html>");
    let located = MainContentLocator::new(CompiledRules::builtin()).locate_with_strategy(&doc);

    assert_eq!(located.strategy, LocateStrategy::Body);
    assert_eq!(located.element.value().name(), "body");
}

#[rstest]
#[case("<body><article>{long}</article></body>", LocateStrategy::SelectorCascade)]
#[case("<body><div><div>{paras}</div></div></body>", LocateStrategy::ParagraphDensity)]
#[case("<body><div>{long}</div></body>", LocateStrategy::DivDensity)]
#[case("<body><span>short</span></body>", LocateStrategy::LargestElement)]
#[case("<body></body>", LocateStrategy::Body)]
fn test_strategy_order(#[case] template: &str, #[case] expected: LocateStrategy) {
    let html = template
        .replace("{long}", &"word ".repeat(120))
        .replace("{paras}", &paragraphs(3));
    let doc = Document::parse(&html);
    let located = MainContentLocator::new(CompiledRules::builtin()).locate_with_strategy(&doc);
    assert_eq!(located.strategy, expected, "page: {template}");
}

// ---------------------------------------------------------------------------
// Custom rules
// ---------------------------------------------------------------------------

#[test]
fn test_custom_threshold_and_selectors() {
    let rules = ExtractionRules {
        content_selectors: vec![".entry".to_string()],
        content_min_chars: 5,
        ..Default::default()
    };
    let compiled = CompiledRules::compile(&rules).unwrap();
    let doc = Document::parse("<body><div class=\"entry\" id=\"e\">Short but enough</div></body>");
    let located = MainContentLocator::new(&compiled).locate_with_strategy(&doc);

    assert_eq!(located.strategy, LocateStrategy::SelectorCascade);
    assert_eq!(id_of(located.element), Some("e"));
}

#[test]
fn test_invalid_selector_is_reported() {
    let rules = ExtractionRules {
        content_selectors: vec!["div[".to_string()],
        ..Default::default()
    };
    let err = CompiledRules::compile(&rules).unwrap_err();
    assert!(err.to_string().contains("div["));
}
