use crate::error::{NwisError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

pub const FIELD_MEASUREMENTS_URL: &str = "https://waterdata.usgs.gov/pa/nwis/measurements";
pub const PEAKS_URL: &str = "https://nwis.waterdata.usgs.gov/nwis/peak";
pub const RATINGS_URL: &str = "https://waterdata.usgs.gov/nwisweb/data/ratings/exsa";
pub const STATISTICS_URL: &str = "https://waterservices.usgs.gov/nwis/stat/";

/// Column names given to the four value columns of an expanded rating table.
pub const RATING_COLUMNS: [&str; 4] = ["stage", "shift", "discharge", "stor"];

/// The RDB datasets this crate knows how to fetch.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Dataset {
    FieldMeasurements,
    Peaks,
    RatingCurve,
    Statistics,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dataset::FieldMeasurements => "field measurements",
            Dataset::Peaks => "annual peak discharges",
            Dataset::RatingCurve => "rating curve",
            Dataset::Statistics => "statistics",
        };
        f.write_str(name)
    }
}

/// Report granularity for the statistics service.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatReportType {
    #[default]
    Daily,
    Monthly,
    Annual,
}

impl StatReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatReportType::Daily => "daily",
            StatReportType::Monthly => "monthly",
            StatReportType::Annual => "annual",
        }
    }
}

impl fmt::Display for StatReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatReportType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(StatReportType::Daily),
            "monthly" => Ok(StatReportType::Monthly),
            "annual" => Ok(StatReportType::Annual),
            other => Err(format!(
                "unknown report type `{other}`, expected daily, monthly or annual"
            )),
        }
    }
}

/// Service endpoints and transport settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub field_measurements_url: String,
    pub peaks_url: String,
    pub ratings_url: String,
    pub statistics_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            field_measurements_url: FIELD_MEASUREMENTS_URL.to_string(),
            peaks_url: PEAKS_URL.to_string(),
            ratings_url: RATINGS_URL.to_string(),
            statistics_url: STATISTICS_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// A request target: base URL plus query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub query: Vec<(String, String)>,
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl ClientConfig {
    pub fn field_measurements(&self, site: &str) -> Request {
        Request {
            url: self.field_measurements_url.clone(),
            query: pairs(&[
                ("site_no", site),
                ("agency_cd", "USGS"),
                ("format", "rdb_expanded"),
            ]),
        }
    }

    pub fn peaks(&self, site: &str) -> Request {
        Request {
            url: self.peaks_url.clone(),
            query: pairs(&[("site_no", site), ("agency_cd", "USGS"), ("format", "rdb")]),
        }
    }

    pub fn rating_curve(&self, site: &str) -> Request {
        Request {
            url: format!("{}/USGS.{}.exsa.rdb", self.ratings_url.trim_end_matches('/'), site),
            query: Vec::new(),
        }
    }

    /// Statistics request. `extra` parameters replace defaults with the same key.
    pub fn statistics(
        &self,
        sites: &str,
        report_type: StatReportType,
        extra: &[(String, String)],
    ) -> Request {
        let mut query = pairs(&[
            ("statReportType", report_type.as_str()),
            ("statType", "all"),
            ("sites", sites),
            ("format", "rdb"),
        ]);
        for (key, value) in extra {
            match query.iter_mut().find(|(k, _)| k == key) {
                Some(entry) => entry.1 = value.clone(),
                None => query.push((key.clone(), value.clone())),
            }
        }
        Request {
            url: self.statistics_url.clone(),
            query,
        }
    }
}

/// Validate a single site id.
pub fn check_site(site: &str) -> Result<&str> {
    let trimmed = site.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return Err(NwisError::InvalidSite(site.to_string()));
    }
    Ok(trimmed)
}

/// Validate a list of site ids and join them with commas.
pub fn join_sites<S: AsRef<str>>(sites: &[S]) -> Result<String> {
    if sites.is_empty() {
        return Err(NwisError::InvalidSite(String::new()));
    }
    let checked = sites
        .iter()
        .map(|s| check_site(s.as_ref()))
        .collect::<Result<Vec<&str>>>()?;
    Ok(checked.join(","))
}

/// Parse a `KEY=VALUE` query parameter.
pub fn parse_param(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{s}`")),
    }
}
