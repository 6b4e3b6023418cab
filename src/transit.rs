//! Commute times to stations of interest via the Citymapper transit API.
//!
//! For each station of interest, every other station in the list is routed
//! to it with a departure at the next Tuesday 08:00, and the fastest route
//! duration (minutes) is kept.
//!
//! The API is occasionally flaky and returns bodies without routes. Each
//! request is tried twice; if neither attempt yields routes the duration is
//! recorded as absent rather than failing the run.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::models::{CommuteRow, Station};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

pub const PARTNER_KEY_HEADER: &str = "Citymapper-Partner-Key";

/// Attempts per route before giving up on it.
pub const MAX_ATTEMPTS: usize = 2;

/// Anything that can answer a transit directions query with a raw body.
pub trait DirectionsApi {
    async fn directions(&self, start: &str, end: &str, depart_at: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    duration_seconds: f64,
}

/// Authenticated client for the transit directions endpoint.
#[derive(Debug, Clone)]
pub struct TransitClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl TransitClient {
    pub fn new(settings: &Settings, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config("transit API key must not be empty".to_string()));
        }
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: settings.transit_endpoint.clone(),
            api_key,
        })
    }
}

impl DirectionsApi for TransitClient {
    #[instrument(level = "debug", skip(self))]
    async fn directions(&self, start: &str, end: &str, depart_at: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(PARTNER_KEY_HEADER, &self.api_key)
            .query(&[
                ("start", start),
                ("end", end),
                ("time", depart_at),
                ("time_type", "depart"),
            ])
            .send()
            .await
            .map_err(|e| Error::fetch(&self.endpoint, e))?;
        response.text().await.map_err(|e| Error::fetch(&self.endpoint, e))
    }
}

/// Next `weekday` strictly after `today`, at `hour:00` UTC.
pub fn next_departure(today: NaiveDate, weekday: Weekday, hour: u32) -> Result<DateTime<Utc>> {
    let mut days_ahead =
        weekday.num_days_from_monday() as i64 - today.weekday().num_days_from_monday() as i64;
    if days_ahead <= 0 {
        days_ahead += 7;
    }
    (today + Duration::days(days_ahead))
        .and_hms_opt(hour, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| Error::InvalidInput(format!("hour must be 0-23 (got {hour})")))
}

fn parse_min_duration(body: &str) -> Option<f64> {
    let response: DirectionsResponse = serde_json::from_str(body).ok()?;
    response
        .routes
        .iter()
        .map(|r| r.duration_seconds / 60.0)
        .min_by(f64::total_cmp)
}

/// Fastest route duration in minutes between two `"lat,lon"` points.
///
/// Returns `Ok(None)` when [`MAX_ATTEMPTS`] bodies in a row carry no routes.
/// Transport errors are not retried.
pub async fn min_route_duration<A: DirectionsApi>(
    api: &A,
    start: &str,
    end: &str,
    depart_at: &str,
) -> Result<Option<f64>> {
    for attempt in 1..=MAX_ATTEMPTS {
        let body = api.directions(start, end, depart_at).await?;
        match parse_min_duration(&body) {
            Some(minutes) => return Ok(Some(minutes)),
            None => warn!(attempt, max = MAX_ATTEMPTS, %start, %end, "Response had no routes"),
        }
    }
    Ok(None)
}

/// Route every station to each station of interest.
///
/// # Arguments
///
/// * `api` - Directions backend.
/// * `stations` - All known stations, each with coordinates.
/// * `stations_of_interest` - Names of the destinations; each must be in `stations`.
/// * `depart_at` - RFC 3339 departure time sent with every request.
///
/// # Returns
///
/// One row per (station of interest, other station) pair, grouped by station
/// of interest in input order. A destination is never routed to itself.
///
/// # Errors
///
/// [`Error::InvalidInput`] if a station of interest is not in `stations`;
/// transport errors from `api` propagate unchanged.
#[instrument(level = "info", skip(api, stations), fields(n_stations = stations.len()))]
pub async fn commute_durations<A: DirectionsApi>(
    api: &A,
    stations: &[Station],
    stations_of_interest: &[String],
    depart_at: &str,
) -> Result<Vec<CommuteRow>> {
    let mut rows = Vec::new();

    for soi in stations_of_interest {
        let target = stations
            .iter()
            .find(|s| &s.name == soi)
            .ok_or_else(|| Error::InvalidInput(format!("station of interest {soi:?} not found")))?;
        let end = target.coords();

        for (i, station) in stations.iter().filter(|s| &s.name != soi).enumerate() {
            let minutes = min_route_duration(api, &station.coords(), &end, depart_at).await?;
            debug!(index = i, %soi, station = %station.name, ?minutes, "Routed station");
            rows.push(CommuteRow {
                soi: soi.clone(),
                station: station.name.clone(),
                min_route_duration: minutes,
            });
        }
        info!(%soi, "Finished station of interest");
    }

    Ok(rows)
}

/// Read stations (`NAME,x,y`) from a CSV file.
pub fn read_stations(path: &std::path::Path) -> Result<Vec<Station>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let stations = rdr.deserialize().collect::<std::result::Result<Vec<Station>, _>>()?;
    Ok(stations)
}
