//! Data models for scraped listings and the flattened output table.
//!
//! - [`Listing`]: one property card with its sale history
//! - [`Transaction`]: a single (date, price) sale event
//! - [`SaleRow`]: one output row per transaction
//! - [`SoldPriceTable`]: the flattened result of a whole retrieval
//!
//! Fields the site may not disclose (property type, bedrooms, price) are
//! `Option`s so "unknown" stays distinct from a parse failure.

use serde::{Deserialize, Serialize};

/// One historical sale of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Sale date as printed on the page (e.g. `"12 Jan 2024"`).
    pub sale_date: String,
    /// Sale price in pounds, or `None` when the price was not disclosed.
    pub sale_price: Option<u64>,
}

/// A property card scraped from a results page.
///
/// Transactions keep the order the page lists them in; they are never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub address: String,
    pub property_type: Option<String>,
    pub bedroom_count: Option<u32>,
    pub transactions: Vec<Transaction>,
}

impl Listing {
    /// Expand the listing into one row per transaction.
    ///
    /// A listing with no transactions yields no rows.
    pub fn into_rows(self) -> impl Iterator<Item = SaleRow> {
        let Listing {
            address,
            property_type,
            bedroom_count,
            transactions,
        } = self;

        transactions.into_iter().map(move |t| SaleRow {
            address: address.clone(),
            property_type: property_type.clone(),
            bedroom_count,
            sale_date: t.sale_date,
            sale_price: t.sale_price,
        })
    }
}

/// A flattened output row. Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRow {
    pub address: String,
    pub property_type: Option<String>,
    pub bedroom_count: Option<u32>,
    pub sale_date: String,
    pub sale_price: Option<u64>,
}

/// The result of a retrieval: every transaction of every listing, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoldPriceTable {
    rows: Vec<SaleRow>,
}

impl SoldPriceTable {
    /// Column names, in output order.
    pub const COLUMNS: [&'static str; 5] = [
        "address",
        "property_type",
        "bedroom_count",
        "sale_date",
        "sale_price",
    ];

    pub fn from_listings(listings: impl IntoIterator<Item = Listing>) -> Self {
        Self {
            rows: listings.into_iter().flat_map(Listing::into_rows).collect(),
        }
    }

    pub fn rows(&self) -> &[SaleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A station with its coordinates, as read from the stations CSV.
///
/// Coordinates stay as text so they reach the transit API exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Station {
    #[serde(rename = "NAME")]
    pub name: String,
    /// Longitude.
    pub x: String,
    /// Latitude.
    pub y: String,
}

impl Station {
    /// `"lat,lon"` as the transit API expects it.
    pub fn coords(&self) -> String {
        format!("{},{}", self.y, self.x)
    }
}

/// Fastest commute from `station` to the station of interest `soi`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommuteRow {
    pub soi: String,
    pub station: String,
    /// Minutes, or `None` when no route could be obtained.
    pub min_route_duration: Option<f64>,
}

impl CommuteRow {
    pub const COLUMNS: [&'static str; 3] = ["soi", "station", "min_route_duration"];
}
