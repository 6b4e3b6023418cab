//! JSON output.
//!
//! The table is written as an array of row objects whose keys follow the
//! column order:
//!
//! ```text
//! [{"address":"…","property_type":null,"bedroom_count":2,"sale_date":"…","sale_price":450000}]
//! ```

use crate::error::Result;
use crate::models::SoldPriceTable;
use crate::utils::ensure_parent_dir;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

pub fn table_to_json(table: &SoldPriceTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(table.rows())?)
}

/// Write a [`SoldPriceTable`] to `path` as JSON.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_table(table: &SoldPriceTable, path: &Path) -> Result<()> {
    let json = table_to_json(table)?;
    ensure_parent_dir(path)?;

    if let Err(e) = fs::write(path, json).await {
        error!(error = %e, "Failed to write JSON");
        return Err(e.into());
    }
    info!(rows = table.len(), "Wrote JSON");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Listing, SaleRow, Transaction};

    #[test]
    fn test_table_to_json_uses_null_for_absent_values() {
        let table = SoldPriceTable::from_listings(vec![Listing {
            address: "7, Masbro Road".to_string(),
            property_type: Some("Terraced".to_string()),
            bedroom_count: None,
            transactions: vec![Transaction {
                sale_date: "01 Feb 2021".to_string(),
                sale_price: None,
            }],
        }]);

        let json = table_to_json(&table).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["property_type"], "Terraced");
        assert!(value[0]["bedroom_count"].is_null());
        assert!(value[0]["sale_price"].is_null());

        let rows: Vec<SaleRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(rows, table.rows());
    }

    #[test]
    fn test_empty_table_is_empty_array() {
        let json = table_to_json(&SoldPriceTable::default()).unwrap();
        assert_eq!(json, "[]");
    }

    #[tokio::test]
    async fn test_write_table_creates_file() {
        let dir = std::env::temp_dir().join(format!("rightprice-json-{}", std::process::id()));
        let path = dir.join("sold.json");
        write_table(&SoldPriceTable::default(), &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
