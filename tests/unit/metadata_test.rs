//! Unit tests for the Metadata Extractor: author, publish date and categories.

use chrono::{Locale, NaiveDate};
use clean_reader::dom::Document;
use clean_reader::services::metadata::{extract_metadata, format_date, parse_date};
use rstest::rstest;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Author
// ---------------------------------------------------------------------------

#[test]
fn test_meta_author() {
    let doc = Document::parse(
        r#"<html><head><meta name="author" content="Jane Doe"></head><body><p>x</p></body></html>"#,
    );
    assert_eq!(extract_metadata(&doc).author.as_deref(), Some("Jane Doe"));
}

#[test]
fn test_meta_author_beats_byline() {
    let doc = Document::parse(
        r#"<html><head><meta name="author" content="Jane Doe"></head><body><span class="byline">By Someone Else</span></body></html>"#,
    );
    assert_eq!(extract_metadata(&doc).author.as_deref(), Some("Jane Doe"));
}

#[rstest]
#[case(r#"<span class="author">Ann Lee</span>"#)]
#[case(r#"<div class="byline">  Ann
    Lee </div>"#)]
#[case(r#"<a rel="author" href="/ann">Ann Lee</a>"#)]
#[case(r#"<span itemprop="author">Ann Lee</span>"#)]
#[case(r#"<span class="post-author-name">Ann Lee</span>"#)]
fn test_author_selectors(#[case] markup: &str) {
    let doc = Document::parse(&format!("<body>{}</body>", markup));
    assert_eq!(extract_metadata(&doc).author.as_deref(), Some("Ann Lee"));
}

#[test]
fn test_empty_author_moves_to_next_selector() {
    let doc = Document::parse(
        r#"<html><head><meta name="author" content="  "></head><body><span class="byline">Ann Lee</span></body></html>"#,
    );
    assert_eq!(extract_metadata(&doc).author.as_deref(), Some("Ann Lee"));
}

// ---------------------------------------------------------------------------
// Publish date
// ---------------------------------------------------------------------------

#[test]
fn test_unparseable_date_falls_back_to_next_selector() {
    let doc = Document::parse(
        r#"<html><head><meta property="article:published_time" content="sometime last week"></head>
        <body><time datetime="2023-11-02T08:00:00Z">Nov 2</time></body></html>"#,
    );
    assert_eq!(extract_metadata(&doc).published, Some(ymd(2023, 11, 2)));
}

#[test]
fn test_time_text_used_without_datetime() {
    let doc = Document::parse("<body><time>March 5, 2024</time></body>");
    assert_eq!(extract_metadata(&doc).published, Some(ymd(2024, 3, 5)));
}

#[test]
fn test_no_date_anywhere() {
    let doc = Document::parse("<body><p>No dates here.</p></body>");
    assert_eq!(extract_metadata(&doc).published, None);
}

#[rstest]
#[case("2024-03-05", Some((2024, 3, 5)))]
#[case("2024-03-05T23:59:59-05:00", Some((2024, 3, 5)))]
#[case("05 Mar 2024", Some((2024, 3, 5)))]
#[case("31.12.2023", Some((2023, 12, 31)))]
#[case("not a date", None)]
#[case("2024-02-30", None)]
fn test_parse_date(#[case] raw: &str, #[case] expected: Option<(i32, u32, u32)>) {
    assert_eq!(
        parse_date(raw),
        expected.map(|(y, m, d)| ymd(y, m, d)),
        "raw: {raw}"
    );
}

#[test]
fn test_format_date_follows_locale() {
    let date = ymd(2024, 3, 5);
    assert_eq!(format_date(date, Locale::en_US), "03/05/2024");
    assert_ne!(format_date(date, Locale::de_DE), format_date(date, Locale::en_US));
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[test]
fn test_categories_from_first_matching_selector_only() {
    let doc = Document::parse(
        r#"<body>
            <div class="post-categories"><a href="/a">Science</a><a href="/b"> Space </a></div>
            <div class="categories"><a href="/c">Ignored</a></div>
        </body>"#,
    );
    assert_eq!(extract_metadata(&doc).categories, vec!["Science", "Space"]);
}

#[test]
fn test_meta_section_category() {
    let doc = Document::parse(
        r#"<html><head><meta property="article:section" content="Technology"></head><body></body></html>"#,
    );
    assert_eq!(extract_metadata(&doc).categories, vec!["Technology"]);
}

#[test]
fn test_nothing_found_is_empty_metadata() {
    let doc = Document::parse("<body><p>Plain page</p></body>");
    assert!(extract_metadata(&doc).is_empty());
}
