//! Markup queries for the sold-prices results pages.
//!
//! Every selector and label pattern tied to the site's markup lives here, so
//! a markup change touches this file only. Callers get three capabilities:
//! select nodes, read a node's text, and find a sub-node by its
//! `aria-label`.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e:?}"))
}

/// Pagination dropdown holding the "of N" label.
pub static PAGINATION_SECTION: Lazy<Selector> = Lazy::new(|| selector("div.dsrm_dropdown_section"));
pub static PAGINATION_LABEL: Lazy<Selector> = Lazy::new(|| selector("span"));

pub static PROPERTY_CARD: Lazy<Selector> =
    Lazy::new(|| selector(r#"a[data-testid="propertyCard"]"#));
pub static CARD_HEADING: Lazy<Selector> = Lazy::new(|| selector("h2"));
pub static LABELLED_DIV: Lazy<Selector> = Lazy::new(|| selector("div[aria-label]"));
pub static TABLE_CELL: Lazy<Selector> = Lazy::new(|| selector("td"));

pub static PROPERTY_TYPE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)property type:").expect("valid regex"));
pub static BEDROOMS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)bedrooms:").expect("valid regex"));

pub const PROPERTY_TYPE_PREFIX: &str = "Property Type:";
pub const BEDROOMS_PREFIX: &str = "Bedrooms:";
pub const PAGE_COUNT_PREFIX: &str = "of ";
pub const CURRENCY_SYMBOL: char = '£';

/// Concatenated, trimmed text of a node.
pub fn text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// First descendant `div` whose `aria-label` matches `label`.
pub fn find_labelled<'a>(el: ElementRef<'a>, label: &Regex) -> Option<ElementRef<'a>> {
    el.select(&LABELLED_DIV).find(|div| {
        div.value()
            .attr("aria-label")
            .is_some_and(|value| label.is_match(value))
    })
}

/// Node text with `prefix` removed when present.
pub fn text_without_prefix(el: ElementRef<'_>, prefix: &str) -> String {
    let text = text(el);
    match text.strip_prefix(prefix) {
        Some(rest) => rest.trim().to_string(),
        None => text,
    }
}
