/// SQLite forecast cache.
///
/// Persists the last-known weather and temperature values per
/// `(area_code, time)` so forecasts seen earlier can still be shown when a
/// fetch fails. Every operation opens its own connection and releases it when
/// the connection goes out of scope, on success and failure paths alike.
///
/// The schema migrates itself on open: the table is created if missing, and
/// the `min_temp` / `max_temp` columns are added to tables created before
/// temperatures were cached.

use crate::analysis::resolve::ResolvedForecast;
use crate::logging::{self, DataSource};
use crate::model::{CacheEntry, CacheError, CacheRecord};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS weather (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        area_code TEXT,
        area_name TEXT,
        time TEXT,
        weather TEXT,
        min_temp TEXT,
        max_temp TEXT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        UNIQUE(area_code, time)
    )
";

/// Columns added after the first release of the table.
const OPTIONAL_COLUMNS: &[&str] = &["min_temp", "max_temp"];

/// Only supplied values overwrite; `NULL` parameters keep what is stored.
const UPSERT: &str = "
    INSERT INTO weather (area_code, area_name, time, weather, min_temp, max_temp)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(area_code, time) DO UPDATE SET
        area_name = excluded.area_name,
        weather = COALESCE(excluded.weather, weather),
        min_temp = COALESCE(excluded.min_temp, min_temp),
        max_temp = COALESCE(excluded.max_temp, max_temp)
";

/// Result of writing one resolved forecast to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersistOutcome {
    pub written: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct ForecastCache {
    path: PathBuf,
}

impl ForecastCache {
    /// Open the cache at `path`, creating or migrating the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let cache = Self {
            path: path.as_ref().to_path_buf(),
        };
        cache.migrate()?;
        Ok(cache)
    }

    fn connect(&self) -> Result<Connection, CacheError> {
        Ok(Connection::open(&self.path)?)
    }

    fn migrate(&self) -> Result<(), CacheError> {
        let conn = self.connect()?;
        conn.execute_batch(CREATE_TABLE)?;

        for column in OPTIONAL_COLUMNS {
            // Probe with a read; SQLite answers "no such column" on old tables.
            let probe = format!("SELECT {} FROM weather LIMIT 1", column);
            match conn.prepare(&probe) {
                Ok(_) => {}
                Err(e) if e.to_string().contains("no such column") => {
                    conn.execute_batch(&format!("ALTER TABLE weather ADD COLUMN {} TEXT", column))?;
                    logging::info(
                        DataSource::Cache,
                        None,
                        &format!("Added missing column '{}' to weather table", column),
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Insert a row or merge the supplied fields into the existing one.
    pub fn upsert(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let conn = self.connect()?;
        conn.execute(
            UPSERT,
            params![
                entry.area_code,
                entry.area_name,
                entry.time,
                entry.weather,
                entry.min_temp,
                entry.max_temp,
            ],
        )?;
        Ok(())
    }

    /// All rows for `area_code`, ordered by the stored time string.
    pub fn read_all(&self, area_code: &str) -> Result<Vec<CacheRecord>, CacheError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT area_code, area_name, time, weather, min_temp, max_temp, created_at
             FROM weather
             WHERE area_code = ?1
             ORDER BY time",
        )?;

        let rows = stmt.query_map(params![area_code], |row| {
            Ok(CacheRecord {
                area_code: row.get(0)?,
                area_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                time: row.get(2)?,
                weather: row.get(3)?,
                min_temp: row.get(4)?,
                max_temp: row.get(5)?,
                created_at: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
            })
        })?;

        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Write every weather pair and temperature triple of `forecast`.
    ///
    /// Weather and temperatures go in as separate upserts and meet in the
    /// same row through the merge. Failures are logged and counted, never
    /// returned: a cache problem must not hide a forecast that was fetched.
    pub fn persist(&self, selected: &str, forecast: &ResolvedForecast) -> PersistOutcome {
        let mut outcome = PersistOutcome::default();

        for area in &forecast.areas {
            let weather_entries = area.weathers.iter().map(|p| CacheEntry {
                area_code: area.area_code.clone(),
                area_name: area.area_name.clone(),
                time: p.time.clone(),
                weather: Some(p.weather.clone()),
                ..CacheEntry::default()
            });
            let temperature_entries = area.temperatures.iter().map(|p| CacheEntry {
                area_code: area.area_code.clone(),
                area_name: area.area_name.clone(),
                time: p.time.clone(),
                min_temp: Some(p.min.clone()),
                max_temp: Some(p.max.clone()),
                ..CacheEntry::default()
            });

            for entry in weather_entries.chain(temperature_entries) {
                match self.upsert(&entry) {
                    Ok(()) => outcome.written += 1,
                    Err(e) => {
                        outcome.failed += 1;
                        logging::warn(
                            DataSource::Cache,
                            Some(&entry.area_code),
                            &format!("Upsert for {} failed: {}", entry.time, e),
                        );
                    }
                }
            }
        }

        logging::log_persist_summary(selected, outcome.written, outcome.failed);
        outcome
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
