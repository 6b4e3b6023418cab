//! Multi-page sold-price retrieval.
//!
//! Fetches page 1, reads the page count, then walks the remaining pages in
//! order with a fixed pause between requests. Any fetch or parse failure
//! aborts the whole retrieval; there is no partial result.

use crate::error::Result;
use crate::models::SoldPriceTable;
use crate::scrapers::fetch::{fetch_page, PageSource};
use crate::scrapers::rightmove::{extract_listings, extract_page_count, SearchQuery, SearchTarget};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
pub struct SoldPriceRetriever<S> {
    source: S,
    target: SearchTarget,
    page_delay: Duration,
}

impl<S: PageSource> SoldPriceRetriever<S> {
    pub fn new(source: S, target: SearchTarget, page_delay: Duration) -> Self {
        Self {
            source,
            target,
            page_delay,
        }
    }

    /// Validate a postcode search and build a retriever for it.
    ///
    /// Validation happens here, before any request is made.
    pub fn for_postcode(
        source: S,
        base_url: &str,
        postcode: &str,
        radius: Option<f64>,
        years: Option<u32>,
        page_delay: Duration,
    ) -> Result<Self> {
        let query = SearchQuery::new(base_url, postcode, radius, years)?;
        debug!(postcode = query.postcode(), "Validated search");
        Ok(Self::new(source, SearchTarget::Postcode(query), page_delay))
    }

    /// Fetch every results page and flatten the listings into rows.
    #[instrument(level = "info", skip(self), fields(target = ?self.target))]
    pub async fn retrieve(&self) -> Result<SoldPriceTable> {
        let t0 = Instant::now();

        let (n_pages, mut listings) = {
            let first = fetch_page(&self.source, &self.target.page_url(1)).await?;
            let n_pages = extract_page_count(&first)?;
            if n_pages == 0 {
                warn!("Search reports zero result pages");
                return Ok(SoldPriceTable::default());
            }
            (n_pages, extract_listings(&first)?)
        };
        info!(pages = n_pages, "Discovered page count");

        for page in 2..=n_pages {
            sleep(self.page_delay).await;
            let url = self.target.page_url(page);
            let page_listings = {
                let document = fetch_page(&self.source, &url).await?;
                extract_listings(&document)?
            };
            info!(page, count = page_listings.len(), "Extracted page");
            listings.extend(page_listings);
        }

        let n_listings = listings.len();
        let table = SoldPriceTable::from_listings(listings);
        info!(
            listings = n_listings,
            rows = table.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Retrieval complete"
        );
        Ok(table)
    }
}
