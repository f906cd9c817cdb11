/// Plain-text navigation shell
///
/// Drives the region directory, the forecast fetcher, the resolver and the
/// cache for one navigation step at a time, and renders the results as text.
/// The stdin loop itself lives in `main.rs`; everything here is testable
/// without a terminal.

use crate::analysis::resolve::{self, Resolution};
use crate::config::Config;
use crate::db::{ForecastCache, PersistOutcome};
use crate::ingest::jma;
use crate::logging::{self, DataSource};
use crate::model::{CacheError, CacheRecord, JmaError, RegionDirectory};
use crate::regions;
use reqwest::blocking::Client;

/// Everything one forecast screen shows.
#[derive(Debug)]
pub struct ForecastView {
    pub code: String,
    pub name: String,
    pub outcome: Result<Resolution, JmaError>,
    /// `None` when nothing was written (fetch failed, nothing matched, or no cache).
    pub persisted: Option<PersistOutcome>,
    /// Rows cached for the selected code and its children.
    pub cached: Result<Vec<CacheRecord>, CacheError>,
}

/// Fetch, resolve and cache the forecast for `code`, then read back what
/// the cache holds for it. Cached rows are read even when the fetch fails.
/// With no cache the view simply has no cached rows.
pub fn show_forecast(
    client: &Client,
    config: &Config,
    cache: Option<&ForecastCache>,
    dir: &RegionDirectory,
    code: &str,
) -> ForecastView {
    let outcome = jma::fetch_forecast(client, &config.forecast_base_url, code)
        .map(|reports| resolve::resolve(code, &reports, dir));

    let persisted = match &outcome {
        Ok(Resolution::Found(forecast)) => cache.map(|cache| cache.persist(code, forecast)),
        Ok(Resolution::NotFound) => {
            logging::info(DataSource::Forecast, Some(code), "No matching area in forecast");
            None
        }
        Err(e) => {
            logging::log_fetch_failure(DataSource::Forecast, code, "Forecast fetch", e);
            None
        }
    };

    let cached = match cache {
        Some(cache) => cached_rows(cache, dir, code),
        None => Ok(Vec::new()),
    };
    if let Err(e) = &cached {
        logging::warn(DataSource::Cache, Some(code), &format!("Cache read failed: {}", e));
    }

    ForecastView {
        code: code.to_string(),
        name: regions::region_name(code, dir).unwrap_or(code).to_string(),
        outcome,
        persisted,
        cached,
    }
}

/// Rows are stored under the matched area codes, which for an office are
/// usually its children, so both are read.
fn cached_rows(
    cache: &ForecastCache,
    dir: &RegionDirectory,
    code: &str,
) -> Result<Vec<CacheRecord>, CacheError> {
    let mut rows = cache.read_all(code)?;
    for child in regions::child_codes(code, dir) {
        rows.extend(cache.read_all(child)?);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// `MM/DD HH:MM` for RFC 3339 timestamps, the raw string otherwise.
pub fn format_time(time: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(time)
        .map(|t| t.format("%m/%d %H:%M").to_string())
        .unwrap_or_else(|_| time.to_string())
}

pub fn render_centers(dir: &RegionDirectory) -> String {
    let mut out = String::from("Select a region:\n");
    for (i, (_, name)) in regions::centers(dir).iter().enumerate() {
        out.push_str(&format!("  {:>2}. {}\n", i + 1, name));
    }
    out.push_str("   q. Quit\n");
    out
}

pub fn render_offices(center_code: &str, dir: &RegionDirectory) -> String {
    let center_name = regions::region_name(center_code, dir).unwrap_or(center_code);
    let mut out = format!("Sub-regions of {}:\n", center_name);
    for (i, (_, name)) in regions::offices_of_center(center_code, dir).iter().enumerate() {
        out.push_str(&format!("  {:>2}. {}\n", i + 1, name));
    }
    out.push_str("   b. Back\n");
    out
}

pub fn render_forecast(view: &ForecastView) -> String {
    let mut out = format!("Forecast for {} ({})\n", view.name, view.code);

    match &view.outcome {
        Ok(Resolution::Found(forecast)) => {
            for area in &forecast.areas {
                out.push_str(&format!("Area: {}\n", area.area_name));
                if !area.weathers.is_empty() {
                    out.push_str("  Weather:\n");
                    for p in &area.weathers {
                        out.push_str(&format!("    {}  {}\n", format_time(&p.time), p.weather));
                    }
                }
                if !area.temperatures.is_empty() {
                    out.push_str("  Temperature:\n");
                    for p in &area.temperatures {
                        out.push_str(&format!(
                            "    {}  min {}°C, max {}°C\n",
                            format_time(&p.time),
                            p.min,
                            p.max
                        ));
                    }
                }
            }
        }
        Ok(Resolution::NotFound) => {
            out.push_str("No forecast found for the selected region.\n");
        }
        Err(e) => {
            out.push_str(&format!("Failed to fetch forecast: {}\n", e));
        }
    }

    match &view.cached {
        Ok(rows) if rows.is_empty() => {}
        Ok(rows) => {
            out.push_str("Cached forecasts:\n");
            for row in rows {
                out.push_str(&format!(
                    "  {}  {}: {}",
                    format_time(&row.time),
                    row.area_name,
                    row.weather.as_deref().unwrap_or("-")
                ));
                if let (Some(min), Some(max)) = (&row.min_temp, &row.max_temp) {
                    out.push_str(&format!(", min {}°C, max {}°C", min, max));
                }
                out.push('\n');
            }
        }
        Err(e) => {
            out.push_str(&format!("Cache unavailable: {}\n", e));
        }
    }

    out.push_str("   b. Back\n");
    out
}

/// Parse a 1-based menu choice into an index below `len`.
pub fn parse_choice(input: &str, len: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Some(n - 1),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::resolve::{AreaForecast, ResolvedForecast, TemperaturePoint, WeatherPoint};
    use crate::model::RegionInfo;

    fn view(outcome: Result<Resolution, JmaError>, cached: Vec<CacheRecord>) -> ForecastView {
        ForecastView {
            code: "130000".to_string(),
            name: "Tokyo".to_string(),
            outcome,
            persisted: None,
            cached: Ok(cached),
        }
    }

    fn record(time: &str, weather: Option<&str>, min: Option<&str>, max: Option<&str>) -> CacheRecord {
        CacheRecord {
            area_code: "130010".to_string(),
            area_name: "Tokyo Area".to_string(),
            time: time.to_string(),
            weather: weather.map(String::from),
            min_temp: min.map(String::from),
            max_temp: max.map(String::from),
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_format_time_rfc3339_and_fallback() {
        assert_eq!(format_time("2024-01-02T11:00:00+09:00"), "01/02 11:00");
        assert_eq!(format_time("tomorrow"), "tomorrow");
    }

    #[test]
    fn test_parse_choice_bounds() {
        assert_eq!(parse_choice(" 1\n", 3), Some(0));
        assert_eq!(parse_choice("3", 3), Some(2));
        assert_eq!(parse_choice("0", 3), None);
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("b", 3), None);
    }

    #[test]
    fn test_render_found_forecast() {
        let forecast = ResolvedForecast {
            areas: vec![AreaForecast {
                area_code: "130010".to_string(),
                area_name: "Tokyo Area".to_string(),
                weathers: vec![WeatherPoint {
                    time: "2024-01-01T11:00:00+09:00".to_string(),
                    weather: "Sunny".to_string(),
                }],
                temperatures: vec![TemperaturePoint {
                    time: "2024-01-02T00:00:00+09:00".to_string(),
                    min: "2".to_string(),
                    max: "11".to_string(),
                }],
            }],
        };
        let text = render_forecast(&view(Ok(Resolution::Found(forecast)), vec![]));

        assert!(text.contains("Area: Tokyo Area"));
        assert!(text.contains("01/01 11:00  Sunny"));
        assert!(text.contains("01/02 00:00  min 2°C, max 11°C"));
        assert!(!text.contains("Cached forecasts"));
    }

    #[test]
    fn test_render_not_found_and_fetch_failure() {
        let text = render_forecast(&view(Ok(Resolution::NotFound), vec![]));
        assert!(text.contains("No forecast found"));

        let text = render_forecast(&view(Err(JmaError::HttpStatus(500)), vec![]));
        assert!(text.contains("Failed to fetch forecast: HTTP error: 500"));
    }

    #[test]
    fn test_render_cached_rows_shows_temperatures_only_when_both_present() {
        let rows = vec![
            record("2024-01-01T11:00:00+09:00", Some("Sunny"), Some("2"), Some("11")),
            record("2024-01-02T00:00:00+09:00", Some("Rain"), Some("3"), None),
            record("2024-01-03T00:00:00+09:00", None, None, None),
        ];
        let text = render_forecast(&view(Err(JmaError::HttpStatus(503)), rows));

        assert!(text.contains("Cached forecasts:"));
        assert!(text.contains("01/01 11:00  Tokyo Area: Sunny, min 2°C, max 11°C"));
        assert!(text.contains("01/02 00:00  Tokyo Area: Rain\n"));
        assert!(text.contains("01/03 00:00  Tokyo Area: -\n"));
    }

    #[test]
    fn test_render_menus() {
        let mut dir = RegionDirectory::default();
        dir.centers.insert(
            "010300".into(),
            RegionInfo {
                name: "Kanto Koshin".into(),
                children: vec!["130000".into(), "990000".into()],
            },
        );
        dir.offices.insert(
            "130000".into(),
            RegionInfo {
                name: "Tokyo".into(),
                children: vec![],
            },
        );

        let centers = render_centers(&dir);
        assert!(centers.contains(" 1. Kanto Koshin"));

        let offices = render_offices("010300", &dir);
        assert!(offices.starts_with("Sub-regions of Kanto Koshin:"));
        assert!(offices.contains(" 1. Tokyo"));
        assert!(offices.contains(" 2. Unknown region"));
    }
}
