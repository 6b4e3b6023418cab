//! Rightmove sold-prices scraper.
//!
//! # URL Pattern
//!
//! Search results are paginated and 1-indexed:
//!
//! ```text
//! <base>/<postcode>.html?pageNumber=<n>[&radius=<r>][&soldIn=<y>]
//! ```
//!
//! Alternatively a search can be set up on the site and its URL (cut right
//! after `pageNumber=`) passed as-is; the page number is then appended.
//!
//! # Markup
//!
//! The total page count lives in the pagination dropdown ("of N"). Each
//! result is a property card with a heading, optional labelled property type
//! and bedroom divs, and a table of sale dates and prices.

use crate::error::{Error, Result};
use crate::models::{Listing, Transaction};
use crate::scrapers::markup;
use crate::validate::{validate_postcode, validate_radius, validate_years};
use scraper::{ElementRef, Html};
use tracing::{debug, instrument};
use url::Url;

/// Build the URL of one results page.
///
/// # Arguments
///
/// * `base_url` - Site root for sold-price searches, without a trailing `/`.
/// * `postcode` - Normalised postcode as returned by [`validate_postcode`].
/// * `page_number` - 1-indexed results page.
/// * `radius` - Search radius in miles; omitted from the query when `None`.
/// * `years` - Sold-within window in years; omitted from the query when `None`.
///
/// # Returns
///
/// The page URL, e.g. `<base>/w14-0db.html?pageNumber=2&radius=0.5`.
pub fn build_url(
    base_url: &str,
    postcode: &str,
    page_number: u32,
    radius: Option<f64>,
    years: Option<u32>,
) -> String {
    let mut url = format!("{base_url}/{postcode}.html?pageNumber={page_number}");
    if let Some(r) = radius {
        url.push_str(&format!("&radius={r}"));
    }
    if let Some(y) = years {
        url.push_str(&format!("&soldIn={y}"));
    }
    url
}

/// A validated postcode search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    base_url: String,
    postcode: String,
    radius: Option<f64>,
    years: Option<u32>,
}

impl SearchQuery {
    /// Validate and normalise the inputs of a postcode search.
    pub fn new(base_url: &str, postcode: &str, radius: Option<f64>, years: Option<u32>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            postcode: validate_postcode(postcode)?,
            radius: validate_radius(radius)?,
            years: validate_years(years)?,
        })
    }

    /// Normalised postcode, e.g. `w14-0db`.
    pub fn postcode(&self) -> &str {
        &self.postcode
    }
}

/// Where the result pages come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchTarget {
    Postcode(SearchQuery),
    /// A search URL ending in `pageNumber=`.
    PrebuiltUrl(String),
}

impl SearchTarget {
    /// Accept a pre-built search URL.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the URL is not absolute or does not end in
    /// `pageNumber=`.
    pub fn prebuilt(url: &str) -> Result<Self> {
        Url::parse(url).map_err(|e| Error::InvalidInput(format!("invalid search URL {url:?}: {e}")))?;
        if !url.ends_with("pageNumber=") {
            return Err(Error::InvalidInput(format!(
                "search URL must end with 'pageNumber=' (got {url:?})"
            )));
        }
        Ok(SearchTarget::PrebuiltUrl(url.to_string()))
    }

    pub fn page_url(&self, page_number: u32) -> String {
        match self {
            SearchTarget::Postcode(q) => {
                build_url(&q.base_url, &q.postcode, page_number, q.radius, q.years)
            }
            SearchTarget::PrebuiltUrl(prefix) => format!("{prefix}{page_number}"),
        }
    }
}

/// Read the total number of result pages from the pagination dropdown.
///
/// # Errors
///
/// [`Error::Parse`] if the dropdown or its "of N" label is missing.
pub fn extract_page_count(document: &Html) -> Result<u32> {
    let section = document
        .select(&markup::PAGINATION_SECTION)
        .next()
        .ok_or_else(|| Error::Parse("pagination dropdown not found".to_string()))?;
    let label = section
        .select(&markup::PAGINATION_LABEL)
        .nth(1)
        .ok_or_else(|| Error::Parse("page count label not found".to_string()))?;

    let text = markup::text(label);
    text.strip_prefix(markup::PAGE_COUNT_PREFIX)
        .unwrap_or(&text)
        .trim()
        .parse::<u32>()
        .map_err(|e| Error::Parse(format!("page count {text:?} is not a number: {e}")))
}

/// Extract every property card on a results page.
#[instrument(level = "debug", skip_all)]
pub fn extract_listings(document: &Html) -> Result<Vec<Listing>> {
    let listings = document
        .select(&markup::PROPERTY_CARD)
        .map(extract_listing)
        .collect::<Result<Vec<_>>>()?;
    debug!(count = listings.len(), "Extracted listings");
    Ok(listings)
}

fn extract_listing(card: ElementRef<'_>) -> Result<Listing> {
    Ok(Listing {
        address: extract_address(card)?,
        property_type: extract_property_type(card),
        bedroom_count: extract_bedrooms(card)?,
        transactions: extract_transactions(card)?,
    })
}

fn extract_address(card: ElementRef<'_>) -> Result<String> {
    let address = card
        .select(&markup::CARD_HEADING)
        .next()
        .map(markup::text)
        .ok_or_else(|| Error::Parse("property card has no address heading".to_string()))?;
    if address.is_empty() {
        return Err(Error::Parse("property card has an empty address".to_string()));
    }
    Ok(address)
}

fn extract_property_type(card: ElementRef<'_>) -> Option<String> {
    markup::find_labelled(card, &markup::PROPERTY_TYPE_LABEL)
        .map(|div| markup::text_without_prefix(div, markup::PROPERTY_TYPE_PREFIX))
}

fn extract_bedrooms(card: ElementRef<'_>) -> Result<Option<u32>> {
    let Some(div) = markup::find_labelled(card, &markup::BEDROOMS_LABEL) else {
        return Ok(None);
    };
    let text = markup::text_without_prefix(div, markup::BEDROOMS_PREFIX);
    text.parse::<u32>()
        .map(Some)
        .map_err(|e| Error::Parse(format!("bedroom count {text:?} is not a number: {e}")))
}

/// Pair up date and price cells, skipping the two header cells and stopping
/// at the first empty cell.
fn extract_transactions(card: ElementRef<'_>) -> Result<Vec<Transaction>> {
    let cells: Vec<String> = card
        .select(&markup::TABLE_CELL)
        .skip(2)
        .map(markup::text)
        .take_while(|text| !text.is_empty())
        .collect();

    let pairs = cells.chunks_exact(2);
    if let [date] = pairs.remainder() {
        return Err(Error::Parse(format!("sale date {date:?} has no price cell")));
    }
    pairs
        .map(|pair| {
            Ok(Transaction {
                sale_date: pair[0].clone(),
                sale_price: parse_price(&pair[1])?,
            })
        })
        .collect()
}

/// `"£1,250,000"` → `Some(1250000)`; text without the currency symbol
/// (e.g. "Price not disclosed") → `None`.
fn parse_price(text: &str) -> Result<Option<u64>> {
    let Some(amount) = text.strip_prefix(markup::CURRENCY_SYMBOL) else {
        return Ok(None);
    };
    amount
        .replace(',', "")
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|e| Error::Parse(format!("sale price {text:?} is not a number: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_URL;

    const PAGE: &str = include_str!("../../fixtures/sold_prices_page_1.html");

    fn document() -> Html {
        Html::parse_document(PAGE)
    }

    #[test]
    fn test_build_url_without_filters() {
        assert_eq!(
            build_url(DEFAULT_BASE_URL, "w14-0db", 1, None, None),
            "https://www.rightmove.co.uk/house-prices/w14-0db.html?pageNumber=1"
        );
        assert_eq!(
            build_url(DEFAULT_BASE_URL, "w14-0db", 5, None, None),
            "https://www.rightmove.co.uk/house-prices/w14-0db.html?pageNumber=5"
        );
    }

    #[test]
    fn test_build_url_parameter_order() {
        assert_eq!(
            build_url(DEFAULT_BASE_URL, "w14-0db", 1, Some(0.25), Some(2)),
            "https://www.rightmove.co.uk/house-prices/w14-0db.html?pageNumber=1&radius=0.25&soldIn=2"
        );
        assert_eq!(
            build_url(DEFAULT_BASE_URL, "w14-0db", 3, None, Some(10)),
            "https://www.rightmove.co.uk/house-prices/w14-0db.html?pageNumber=3&soldIn=10"
        );
        assert_eq!(
            build_url(DEFAULT_BASE_URL, "w14-0db", 2, Some(1.0), None),
            "https://www.rightmove.co.uk/house-prices/w14-0db.html?pageNumber=2&radius=1"
        );
    }

    #[test]
    fn test_search_query_normalises_postcode() {
        let query = SearchQuery::new(DEFAULT_BASE_URL, "HA0 1AQ", None, None).unwrap();
        assert_eq!(query.postcode(), "ha0-1aq");
        let target = SearchTarget::Postcode(query);
        assert_eq!(
            target.page_url(1),
            "https://www.rightmove.co.uk/house-prices/ha0-1aq.html?pageNumber=1"
        );
    }

    #[test]
    fn test_search_query_rejects_bad_filters() {
        assert!(SearchQuery::new(DEFAULT_BASE_URL, "HA0 1AQ", Some(2.0), None).is_err());
        assert!(SearchQuery::new(DEFAULT_BASE_URL, "HA0 1AQ", None, Some(4)).is_err());
        assert!(SearchQuery::new(DEFAULT_BASE_URL, "HA01AQ", None, None).is_err());
    }

    #[test]
    fn test_prebuilt_url_appends_page_number() {
        let target = SearchTarget::prebuilt(
            "https://www.rightmove.co.uk/house-prices/se3.html?soldIn=2&pageNumber=",
        )
        .unwrap();
        assert_eq!(
            target.page_url(4),
            "https://www.rightmove.co.uk/house-prices/se3.html?soldIn=2&pageNumber=4"
        );
    }

    #[test]
    fn test_prebuilt_url_must_end_with_page_number() {
        assert!(matches!(
            SearchTarget::prebuilt("https://www.rightmove.co.uk/house-prices/se3.html?pageNumber=2"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            SearchTarget::prebuilt("not a url pageNumber="),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_extract_page_count() {
        assert_eq!(extract_page_count(&document()).unwrap(), 1);

        let three_pages = Html::parse_document(&PAGE.replace("<span>of 1</span>", "<span>of 3</span>"));
        assert_eq!(extract_page_count(&three_pages).unwrap(), 3);
    }

    #[test]
    fn test_extract_page_count_missing_control() {
        let doc = Html::parse_document("<html><body><h2>No pagination</h2></body></html>");
        assert!(matches!(extract_page_count(&doc), Err(Error::Parse(_))));

        let one_span = Html::parse_document(
            r#"<div class="dsrm_dropdown_section"><span>Page</span></div>"#,
        );
        assert!(matches!(extract_page_count(&one_span), Err(Error::Parse(_))));
    }

    #[test]
    fn test_extract_listings_from_fixture() {
        let listings = extract_listings(&document()).unwrap();
        assert_eq!(listings.len(), 3);

        let first = &listings[0];
        assert_eq!(first.address, "12, Addison Gardens, London W14 0DB");
        assert_eq!(first.property_type.as_deref(), Some("Flat"));
        assert_eq!(first.bedroom_count, Some(2));
        assert_eq!(
            first.transactions,
            vec![
                Transaction {
                    sale_date: "12 Jan 2024".to_string(),
                    sale_price: Some(450_000),
                },
                Transaction {
                    sale_date: "15 Jun 2020".to_string(),
                    sale_price: Some(380_000),
                },
            ]
        );
    }

    #[test]
    fn test_missing_optional_fields_are_none() {
        let listings = extract_listings(&document()).unwrap();
        let second = &listings[1];
        assert_eq!(second.property_type, None);
        assert_eq!(second.bedroom_count, None);
        assert_eq!(second.transactions.len(), 2);
        assert_eq!(second.transactions[0].sale_date, "20 Mar 2023");
        assert_eq!(second.transactions[0].sale_price, None);
        assert_eq!(second.transactions[1].sale_price, Some(1_250_000));
    }

    #[test]
    fn test_card_without_sales_has_no_transactions() {
        let listings = extract_listings(&document()).unwrap();
        let third = &listings[2];
        assert_eq!(third.property_type.as_deref(), Some("Terraced"));
        assert_eq!(third.bedroom_count, Some(4));
        assert!(third.transactions.is_empty());
    }

    #[test]
    fn test_card_without_heading_is_parse_error() {
        let doc = Html::parse_document(
            r#"<a data-testid="propertyCard" href="/x"><div>no heading</div></a>"#,
        );
        assert!(matches!(extract_listings(&doc), Err(Error::Parse(_))));
    }

    #[test]
    fn test_dangling_date_is_parse_error() {
        let doc = Html::parse_document(
            r#"<a data-testid="propertyCard" href="/x"><h2>1 A Road</h2>
               <table><tr><td>Date sold</td><td>Price</td></tr>
               <tr><td>01 Jan 2020</td></tr></table></a>"#,
        );
        assert!(matches!(extract_listings(&doc), Err(Error::Parse(_))));
    }

    #[test]
    fn test_dangling_date_after_full_sale_names_the_date() {
        let doc = Html::parse_document(
            r#"<a data-testid="propertyCard" href="/x"><h2>1 A Road</h2>
               <table><tr><td>Date sold</td><td>Price</td></tr>
               <tr><td>01 Jan 2020</td><td>£300,000</td></tr>
               <tr><td>02 Feb 2022</td></tr></table></a>"#,
        );
        match extract_listings(&doc) {
            Err(Error::Parse(msg)) => assert!(msg.contains("02 Feb 2022"), "{msg}"),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("£450,000").unwrap(), Some(450_000));
        assert_eq!(parse_price("£1,250,000").unwrap(), Some(1_250_000));
        assert_eq!(parse_price("Price not disclosed").unwrap(), None);
        assert!(matches!(parse_price("£TBC"), Err(Error::Parse(_))));
    }
}
