//! Japanese weather forecast client for the JMA `bosai` API.
//!
//! Loads the region hierarchy, fetches the forecast for a selected office,
//! extracts the weather and temperature series for that office and its
//! sub-areas, and keeps what it has seen in a local SQLite cache.

pub mod analysis;
pub mod config;
pub mod db;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod regions;
pub mod shell;
