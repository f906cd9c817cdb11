/// Core data types for the JMA forecast client.
///
/// This module defines the shared domain model imported by all other modules:
/// the region directory, the forecast document as delivered by the JMA
/// `bosai` API, the cached row shape, and the error types. It contains no
/// logic beyond small accessors and no I/O.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Opaque region identifier as assigned by JMA (e.g. "130000" for Tokyo).
pub type RegionCode = String;

// ---------------------------------------------------------------------------
// Region directory
// ---------------------------------------------------------------------------

/// One entry of the `centers` or `offices` map in `area.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionInfo {
    pub name: String,
    #[serde(default)]
    pub children: Vec<RegionCode>,
}

/// Snapshot of the JMA region hierarchy.
///
/// Centers group several offices; offices list the finer-grained area codes
/// that appear in forecast documents. Other top-level keys of `area.json`
/// (`class10s`, `class15s`, ...) are not needed for navigation and are ignored.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RegionDirectory {
    pub centers: BTreeMap<RegionCode, RegionInfo>,
    pub offices: BTreeMap<RegionCode, RegionInfo>,
}

// ---------------------------------------------------------------------------
// Forecast document
// ---------------------------------------------------------------------------

/// One element of the forecast document's root array.
///
/// Element 0 is the short-term report; element 1 (the weekly outlook) is
/// parsed but not consulted by the resolver.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastReport {
    #[serde(rename = "timeSeries")]
    pub time_series: Vec<TimeSeriesBlock>,
}

/// A block of per-area value arrays aligned with `time_defines`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TimeSeriesBlock {
    #[serde(rename = "timeDefines", default)]
    pub time_defines: Vec<String>, // ISO 8601, e.g. "2024-01-01T00:00:00+09:00"
    /// `None` when the block carries no `areas` key at all.
    #[serde(default)]
    pub areas: Option<Vec<AreaEntry>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AreaRef {
    pub code: RegionCode,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AreaEntry {
    #[serde(default)]
    pub area: Option<AreaRef>,
    #[serde(default)]
    pub weathers: Option<Vec<String>>,
    #[serde(rename = "tempsMin", default)]
    pub temps_min: Option<Vec<String>>,
    #[serde(rename = "tempsMax", default)]
    pub temps_max: Option<Vec<String>>,
}

impl AreaEntry {
    pub fn code(&self) -> Option<&str> {
        self.area.as_ref().map(|a| a.code.as_str())
    }

    pub fn name(&self) -> &str {
        self.area.as_ref().map(|a| a.name.as_str()).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Cache rows
// ---------------------------------------------------------------------------

/// A row of the `weather` table, keyed by `(area_code, time)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRecord {
    pub area_code: String,
    pub area_name: String,
    pub time: String,
    pub weather: Option<String>,
    pub min_temp: Option<String>,
    pub max_temp: Option<String>,
    pub created_at: String,
}

/// Values for a single upsert. `None` fields leave the stored column untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CacheEntry {
    pub area_code: String,
    pub area_name: String,
    pub time: String,
    pub weather: Option<String>,
    pub min_temp: Option<String>,
    pub max_temp: Option<String>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or parsing JMA documents.
#[derive(Debug, thiserror::Error)]
pub enum JmaError {
    /// Non-2xx HTTP response from the JMA API.
    #[error("HTTP error: {0}")]
    HttpStatus(u16),
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body was not the expected document shape.
    #[error("Parse error: {0}")]
    Format(String),
}

impl JmaError {
    /// `true` for the transport/status class, `false` for document-shape errors.
    pub fn is_network(&self) -> bool {
        matches!(self, JmaError::HttpStatus(_) | JmaError::Transport(_))
    }
}

/// Errors raised by the SQLite forecast cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
