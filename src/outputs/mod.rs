//! Writers for the flattened tables.
//!
//! # Submodules
//!
//! - [`csv`]: sold-price and commute tables as CSV (the default)
//! - [`json`]: sold-price table as a JSON array of row objects
//!
//! Absent values become empty CSV cells or JSON `null`s.

pub mod csv;
pub mod json;

use clap::ValueEnum;

/// Output format for the sold-price table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}
