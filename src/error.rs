//! Error types shared by the retrieval pipeline, the writers and the transit
//! command.
//!
//! Markup that is missing from a page is a [`Error::Parse`]. A field the site
//! legitimately leaves out (property type, bedrooms, an undisclosed price) is
//! modelled as `None` on the listing and never reaches this type.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Postcode, radius, years or a pre-built URL failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Network failure or non-success HTTP status.
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Expected markup or response structure is absent.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap any transport-level failure for `url`.
    pub fn fetch(url: &str, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Fetch {
            url: url.to_string(),
            source: source.into(),
        }
    }
}
