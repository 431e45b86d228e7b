// src/scraping/html.rs
//! Shared text extraction over parsed job pages.

use super::ScrapeError;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;

static LD_JSON: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid ld+json selector")
});
static HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("valid h1 selector"));

/// Trimmed, non-empty strings from an iterator of raw text nodes.
pub fn clean_nodes<'a>(nodes: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    nodes.map(str::trim).filter(|text| !text.is_empty()).collect()
}

/// All text nodes of an HTML fragment, stripped and joined by `separator`.
pub fn fragment_text(fragment: &str, separator: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    clean_nodes(parsed.root_element().text()).join(separator)
}

/// Text nodes that are direct children of `element` (no descendants).
pub fn own_text<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    element
        .children()
        .filter_map(|node| node.value().as_text().map(|text| &**text))
}

/// First `application/ld+json` block, decoded. A page without one yields
/// `None`; a block that is not valid JSON is a scrape failure.
pub fn ld_json(document: &Html) -> Result<Option<Value>, ScrapeError> {
    match document.select(&LD_JSON).next() {
        Some(script) => {
            let raw: String = script.text().collect();
            Ok(Some(serde_json::from_str(&raw)?))
        }
        None => Ok(None),
    }
}

/// Non-empty string field of a JSON object.
pub fn str_field<'a>(data: Option<&'a Value>, key: &str) -> Option<&'a str> {
    data.and_then(|d| d.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// First non-blank text directly inside an `<h1>`.
pub fn first_heading(document: &Html) -> Option<String> {
    document
        .select(&HEADING)
        .flat_map(own_text)
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}
