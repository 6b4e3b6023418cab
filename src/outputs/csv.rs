//! CSV output.
//!
//! The header is always written, so an empty result still yields a file with
//! the fixed columns.

use crate::error::Result;
use crate::models::{CommuteRow, SoldPriceTable};
use crate::utils::ensure_parent_dir;
use serde::Serialize;
use std::io;
use std::path::Path;
use tracing::{info, instrument};

/// Write `rows` under an explicit `header` to any writer.
pub fn write_records<W, T>(writer: W, header: &[&str], rows: &[T]) -> Result<()>
where
    W: io::Write,
    T: Serialize,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(header)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the sold-price table to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn write_table(table: &SoldPriceTable, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = std::fs::File::create(path)?;
    write_records(file, &SoldPriceTable::COLUMNS, table.rows())?;
    info!(rows = table.len(), "Wrote CSV");
    Ok(())
}

/// Write commute durations to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn write_commutes(rows: &[CommuteRow], path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = std::fs::File::create(path)?;
    write_records(file, &CommuteRow::COLUMNS, rows)?;
    info!(rows = rows.len(), "Wrote CSV");
    Ok(())
}
