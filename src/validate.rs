//! Validation and normalisation of search inputs.
//!
//! All checks run before any network activity so a bad postcode or filter
//! never costs a request.

use crate::error::{Error, Result};
use itertools::Itertools;

/// Search radii (miles) the site accepts.
pub const RADIUS_CHOICES: [f64; 6] = [0.25, 0.5, 1.0, 3.0, 5.0, 10.0];

/// "Sold in the last N years" values the site accepts.
pub const YEARS_CHOICES: [u32; 6] = [2, 3, 5, 10, 15, 20];

/// Normalise a postcode to the lowercase, hyphenated form used in URLs.
///
/// The outward and inward codes must be separated by whitespace
/// (e.g. `"SE3 0AA"`). Input that is already normalised (`"se3-0aa"`) is
/// returned unchanged, so the function is idempotent on its own output.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when no separator is present.
pub fn validate_postcode(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parts: Vec<&str> = if trimmed.contains(char::is_whitespace) {
        trimmed.split_whitespace().collect()
    } else {
        trimmed.split('-').collect()
    };

    if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(Error::InvalidInput(format!(
            "postcode must contain a space separator e.g. SE3 0AA (got {raw:?})"
        )));
    }

    Ok(parts.join("-").to_lowercase())
}

/// Check an optional search radius against [`RADIUS_CHOICES`].
pub fn validate_radius(radius: Option<f64>) -> Result<Option<f64>> {
    match radius {
        Some(r) if !RADIUS_CHOICES.contains(&r) => Err(Error::InvalidInput(format!(
            "radius must be one of: {}",
            RADIUS_CHOICES.iter().join(", ")
        ))),
        _ => Ok(radius),
    }
}

/// Check an optional year range against [`YEARS_CHOICES`].
pub fn validate_years(years: Option<u32>) -> Result<Option<u32>> {
    match years {
        Some(y) if !YEARS_CHOICES.contains(&y) => Err(Error::InvalidInput(format!(
            "years must be one of: {}",
            YEARS_CHOICES.iter().join(", ")
        ))),
        _ => Ok(years),
    }
}
