/// Region resolution over a fetched forecast document
///
/// An area entry matches the selection when its code equals the selected
/// code or is one of the selected region's declared children. Only report
/// 0 (the short-term forecast) is consulted. Output follows document order
/// for blocks and areas, and `timeDefines` order within an entry.
///
/// This is a pure function of its inputs: no I/O, no clock, no globals.

use crate::model::{AreaEntry, ForecastReport, RegionDirectory};
use crate::regions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherPoint {
    pub time: String,
    pub weather: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemperaturePoint {
    pub time: String,
    pub min: String,
    pub max: String,
}

/// Values extracted from one matching area entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaForecast {
    pub area_code: String,
    pub area_name: String,
    pub weathers: Vec<WeatherPoint>,
    pub temperatures: Vec<TemperaturePoint>,
}

/// All matching entries, one per (block, area) match, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedForecast {
    pub areas: Vec<AreaForecast>,
}

impl ResolvedForecast {
    /// Flattened `(time, weather)` pairs across all matching entries.
    pub fn weather_pairs(&self) -> Vec<(&str, &str)> {
        self.areas
            .iter()
            .flat_map(|a| a.weathers.iter())
            .map(|p| (p.time.as_str(), p.weather.as_str()))
            .collect()
    }

    /// Flattened `(time, min, max)` triples across all matching entries.
    pub fn temperature_triples(&self) -> Vec<(&str, &str, &str)> {
        self.areas
            .iter()
            .flat_map(|a| a.temperatures.iter())
            .map(|p| (p.time.as_str(), p.min.as_str(), p.max.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ResolvedForecast),
    /// No area entry matched the selection. A valid outcome, not an error.
    NotFound,
}

pub fn resolve(selected: &str, reports: &[ForecastReport], dir: &RegionDirectory) -> Resolution {
    let Some(report) = reports.first() else {
        return Resolution::NotFound;
    };
    let children = regions::child_codes(selected, dir);

    let mut areas = Vec::new();
    for block in &report.time_series {
        // Blocks without an `areas` key carry nothing to match.
        let Some(entries) = &block.areas else {
            continue;
        };

        for entry in entries {
            let Some(code) = entry.code() else {
                continue;
            };
            if code == selected || children.iter().any(|c| c == code) {
                areas.push(extract(code, entry, &block.time_defines));
            }
        }
    }

    if areas.is_empty() {
        Resolution::NotFound
    } else {
        Resolution::Found(ResolvedForecast { areas })
    }
}

/// Length mismatches against `times` suppress that field group only.
fn extract(code: &str, entry: &AreaEntry, times: &[String]) -> AreaForecast {
    let weathers = match &entry.weathers {
        Some(weathers) if weathers.len() == times.len() => times
            .iter()
            .zip(weathers)
            .map(|(time, weather)| WeatherPoint {
                time: time.clone(),
                weather: weather.clone(),
            })
            .collect(),
        _ => Vec::new(),
    };

    let temperatures = match (&entry.temps_min, &entry.temps_max) {
        (Some(mins), Some(maxs)) if mins.len() == times.len() && maxs.len() == times.len() => {
            times
                .iter()
                .zip(mins.iter().zip(maxs))
                .map(|(time, (min, max))| TemperaturePoint {
                    time: time.clone(),
                    min: min.clone(),
                    max: max.clone(),
                })
                .collect()
        }
        _ => Vec::new(),
    };

    AreaForecast {
        area_code: code.to_string(),
        area_name: entry.name().to_string(),
        weathers,
        temperatures,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
