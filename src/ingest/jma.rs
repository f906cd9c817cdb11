/// JMA (Japan Meteorological Agency) bosai API client
///
/// Retrieves the static region hierarchy (`area.json`) and per-office
/// forecast documents (`forecast/{code}.json`). One blocking request per
/// call: transport defaults only, no retry.
///
/// Region directory: http://www.jma.go.jp/bosai/common/const/area.json
/// Forecasts: https://www.jma.go.jp/bosai/forecast/data/forecast/130000.json

use crate::logging::{self, DataSource};
use crate::model::{ForecastReport, JmaError, RegionDirectory};
use reqwest::blocking::Client;

// ============================================================================
// API Client Functions
// ============================================================================

/// Fetch and parse the region directory.
pub fn fetch_area_json(client: &Client, url: &str) -> Result<RegionDirectory, JmaError> {
    let body = get_text(client, url)?;
    parse_area_json(&body)
}

/// Fetch and parse the forecast document for one region code.
///
/// # Parameters
/// - `client`: HTTP client
/// - `base_url`: forecast directory, e.g. "https://www.jma.go.jp/bosai/forecast/data/forecast"
/// - `code`: office code (e.g. "130000")
pub fn fetch_forecast(
    client: &Client,
    base_url: &str,
    code: &str,
) -> Result<Vec<ForecastReport>, JmaError> {
    let url = build_forecast_url(base_url, code);
    let body = get_text(client, &url)?;
    parse_forecast_json(&body)
}

pub fn build_forecast_url(base_url: &str, code: &str) -> String {
    format!("{}/{}.json", base_url.trim_end_matches('/'), code)
}

fn get_text(client: &Client, url: &str) -> Result<String, JmaError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()?;

    if !response.status().is_success() {
        return Err(JmaError::HttpStatus(response.status().as_u16()));
    }

    Ok(response.text()?)
}

// ============================================================================
// Document Parsing
// ============================================================================

/// Parse `area.json`. Both `centers` and `offices` must be present.
pub fn parse_area_json(body: &str) -> Result<RegionDirectory, JmaError> {
    serde_json::from_str(body).map_err(|e| JmaError::Format(format!("area document: {}", e)))
}

/// Parse a forecast document.
///
/// The root must be a non-empty array, and its first report (the short-term
/// forecast) must carry a `timeSeries` array; anything else is a `Format`
/// error. Later reports that do not match the expected shape are dropped.
pub fn parse_forecast_json(body: &str) -> Result<Vec<ForecastReport>, JmaError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| JmaError::Format(format!("forecast document is not JSON: {}", e)))?;

    let items = match value {
        serde_json::Value::Array(items) if items.is_empty() => {
            return Err(JmaError::Format("forecast document is empty".to_string()));
        }
        serde_json::Value::Array(items) => items,
        _ => {
            return Err(JmaError::Format(
                "forecast document root is not an array".to_string(),
            ));
        }
    };

    let mut reports = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<ForecastReport>(item) {
            Ok(report) => reports.push(report),
            Err(e) if index == 0 => {
                return Err(JmaError::Format(format!("unexpected forecast shape: {}", e)));
            }
            Err(e) => logging::debug(
                DataSource::Forecast,
                None,
                &format!("Skipping forecast report {}: {}", index, e),
            ),
        }
    }
    Ok(reports)
}

// ============================================================================
// Tests
// ============================================================================
