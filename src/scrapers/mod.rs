//! Scraping of sold-price search results.
//!
//! # Submodules
//!
//! | Module | Role |
//! |--------|------|
//! | [`fetch`] | HTTP fetching behind the [`fetch::PageSource`] seam |
//! | [`markup`] | Selectors and node helpers tied to the site's markup |
//! | [`rightmove`] | URL building, page-count and listing extraction |
//!
//! Pages are fetched one at a time. A page is fully parsed and extracted
//! before the next request goes out.

pub mod fetch;
pub mod markup;
pub mod rightmove;
