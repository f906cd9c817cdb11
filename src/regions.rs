/// Region directory lookups.
///
/// Wraps the `area.json` snapshot with the queries the navigation flow and
/// the resolver need: the list of centers, the offices under a center, and
/// the child codes declared for any region. Lookups never fail; unknown
/// codes simply have no children.

use crate::ingest::jma;
use crate::logging::{self, DataSource};
use crate::model::{JmaError, RegionDirectory};
use reqwest::blocking::Client;

/// Display name for a child code that has no `offices` entry.
pub const UNKNOWN_REGION_NAME: &str = "Unknown region";

/// Fetch the region directory. No retry.
pub fn load(client: &Client, url: &str) -> Result<RegionDirectory, JmaError> {
    match jma::fetch_area_json(client, url) {
        Ok(dir) => {
            logging::info(
                DataSource::Area,
                None,
                &format!(
                    "Loaded region directory: {} centers, {} offices",
                    dir.centers.len(),
                    dir.offices.len()
                ),
            );
            Ok(dir)
        }
        Err(e) => {
            logging::log_fetch_failure(DataSource::Area, "area.json", "Region directory load", &e);
            Err(e)
        }
    }
}

/// Declared children of `code`, offices first, then centers.
///
/// Returns an empty slice when the code is unknown or has no children.
pub fn child_codes<'a>(code: &str, dir: &'a RegionDirectory) -> &'a [String] {
    dir.offices
        .get(code)
        .or_else(|| dir.centers.get(code))
        .map(|info| info.children.as_slice())
        .unwrap_or(&[])
}

/// All centers as `(code, name)`, ordered by code.
pub fn centers(dir: &RegionDirectory) -> Vec<(&str, &str)> {
    dir.centers
        .iter()
        .map(|(code, info)| (code.as_str(), info.name.as_str()))
        .collect()
}

/// Offices under `center_code` as `(code, name)`, in the center's declared order.
pub fn offices_of_center<'a>(center_code: &str, dir: &'a RegionDirectory) -> Vec<(&'a str, &'a str)> {
    let Some(center) = dir.centers.get(center_code) else {
        return Vec::new();
    };

    center
        .children
        .iter()
        .map(|code| {
            let name = dir
                .offices
                .get(code)
                .map(|info| info.name.as_str())
                .unwrap_or(UNKNOWN_REGION_NAME);
            (code.as_str(), name)
        })
        .collect()
}

/// Name of a center or office, if the directory knows it.
pub fn region_name<'a>(code: &str, dir: &'a RegionDirectory) -> Option<&'a str> {
    dir.offices
        .get(code)
        .or_else(|| dir.centers.get(code))
        .map(|info| info.name.as_str())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RegionInfo;

    fn info(name: &str, children: &[&str]) -> RegionInfo {
        RegionInfo {
            name: name.to_string(),
            children: children.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn sample_directory() -> RegionDirectory {
        let mut dir = RegionDirectory::default();
        dir.centers
            .insert("010300".into(), info("Kanto Koshin", &["130000", "140000", "990000"]));
        dir.centers.insert("010100".into(), info("Hokkaido", &["016000"]));
        dir.offices
            .insert("130000".into(), info("Tokyo", &["130010", "130020", "130030"]));
        dir.offices.insert("140000".into(), info("Kanagawa", &["140010"]));
        dir.offices.insert("016000".into(), info("Ishikari", &[]));
        dir
    }

    #[test]
    fn test_child_codes_of_office() {
        let dir = sample_directory();
        assert_eq!(child_codes("130000", &dir), ["130010", "130020", "130030"]);
    }

    #[test]
    fn test_child_codes_of_center() {
        let dir = sample_directory();
        assert_eq!(child_codes("010100", &dir), ["016000"]);
    }

    #[test]
    fn test_child_codes_of_unknown_or_terminal_code_is_empty() {
        let dir = sample_directory();
        assert!(child_codes("000000", &dir).is_empty());
        assert!(child_codes("016000", &dir).is_empty());
        assert!(child_codes("130010", &dir).is_empty());
    }

    #[test]
    fn test_centers_are_ordered_by_code() {
        let dir = sample_directory();
        assert_eq!(
            centers(&dir),
            vec![("010100", "Hokkaido"), ("010300", "Kanto Koshin")]
        );
    }

    #[test]
    fn test_offices_of_center_keeps_declared_order_and_names_unknowns() {
        let dir = sample_directory();
        assert_eq!(
            offices_of_center("010300", &dir),
            vec![
                ("130000", "Tokyo"),
                ("140000", "Kanagawa"),
                ("990000", UNKNOWN_REGION_NAME),
            ]
        );
        assert!(offices_of_center("999999", &dir).is_empty());
    }

    #[test]
    fn test_region_name_lookup() {
        let dir = sample_directory();
        assert_eq!(region_name("140000", &dir), Some("Kanagawa"));
        assert_eq!(region_name("010100", &dir), Some("Hokkaido"));
        assert_eq!(region_name("130010", &dir), None);
    }
}
