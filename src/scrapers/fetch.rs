//! Page fetching.
//!
//! [`PageSource`] is the seam between the pipeline and the network: the
//! retriever only asks for the body of a URL. [`HttpFetcher`] is the real
//! implementation; tests substitute fixture pages.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::utils::truncate_for_log;
use reqwest::Client;
use scraper::Html;
use tracing::{debug, instrument};

/// Something that can return the body of a page.
pub trait PageSource {
    /// Fetch `url` once. No retries.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

impl<T: PageSource + ?Sized> PageSource for &T {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        (**self).fetch_text(url).await
    }
}

/// HTTP fetcher with a fixed `User-Agent` and a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl PageSource for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::fetch(url, e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| Error::fetch(url, e))?;
        debug!(%status, bytes = body.len(), preview = %truncate_for_log(&body, 200), "Fetched page");
        Ok(body)
    }
}

/// Fetch `url` and parse it as an HTML document.
///
/// # Arguments
///
/// * `source` - Where page bodies come from (the live site or a test double).
/// * `url` - Absolute URL of the page.
///
/// # Returns
///
/// The parsed document. HTML parsing is lenient, so any body yields one.
///
/// # Errors
///
/// [`Error::Fetch`] if the request fails or returns a non-success status.
pub async fn fetch_page<S: PageSource>(source: &S, url: &str) -> Result<Html> {
    let body = source.fetch_text(url).await?;
    Ok(Html::parse_document(&body))
}
