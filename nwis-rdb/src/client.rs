use crate::{
    dataset::{check_site, join_sites, ClientConfig, Dataset, Request, StatReportType},
    error::{NwisError, Result},
    options::ParseOptions,
    rdb::read_rdb_with,
    series::{rating_columns, TimeSeriesTable},
    table::Table,
};
use log::{info, warn};
use reqwest::{Client, StatusCode};

/// Column promoted to the index of the field measurement table.
pub const FIELD_MEASUREMENT_INDEX: &str = "measurement_dt";

/// Raw reply from an NWIS service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub url: String,
    pub body: String,
}

/// Async client for the NWIS services that answer in RDB.
///
/// Gzip transfer encoding is negotiated by reqwest. There is no retry: a
/// failed request is reported to the caller as is.
#[derive(Debug, Clone)]
pub struct NwisClient {
    client: Client,
    config: ClientConfig,
    options: ParseOptions,
}

impl NwisClient {
    pub fn new(config: ClientConfig) -> Result<NwisClient> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(NwisClient {
            client,
            config,
            options: ParseOptions::default(),
        })
    }

    /// Parser options applied to every response body.
    pub fn with_parse_options(mut self, options: ParseOptions) -> NwisClient {
        self.options = options;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform a GET and return the body whatever the status code.
    pub async fn fetch(&self, request: &Request) -> Result<Response> {
        let response = self
            .client
            .get(&request.url)
            .query(&request.query)
            .send()
            .await?;
        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await?;
        Ok(Response {
            status: status.as_u16(),
            url,
            body,
        })
    }

    /// Fetch a dataset and parse it, refusing to parse anything but a 200 reply.
    async fn fetch_table(
        &self,
        dataset: Dataset,
        site: &str,
        request: &Request,
        options: &ParseOptions,
    ) -> Result<Table> {
        info!(
            "Retrieving {} for site #{} from {}",
            dataset, site, request.url
        );
        let response = self.fetch(request).await?;
        if response.status != StatusCode::OK.as_u16() {
            warn!(
                "NWIS returned an error code of {} for {}: {}",
                response.status, dataset, response.body
            );
            return Err(NwisError::Status {
                status: response.status,
                body: response.body,
            });
        }
        let table = read_rdb_with(&response.body, options)?;
        info!(
            "Parsed {} rows x {} columns of {} for site #{}",
            table.len(),
            table.names().len(),
            dataset,
            site
        );
        Ok(table)
    }

    /// Parser options for field measurements: `measurement_dt` carries a
    /// time of day, so it is read as text and turned into a timestamp later.
    pub fn field_measurement_options(&self) -> ParseOptions {
        self.options.clone().text_column(FIELD_MEASUREMENT_INDEX)
    }

    /// Field measurements of discharge, indexed by `measurement_dt`.
    pub async fn field_measurements(&self, site: &str) -> Result<TimeSeriesTable> {
        let site = check_site(site)?;
        let request = self.config.field_measurements(site);
        let options = self.field_measurement_options();
        let table = self
            .fetch_table(Dataset::FieldMeasurements, site, &request, &options)
            .await?;
        TimeSeriesTable::from_table(table, FIELD_MEASUREMENT_INDEX)
    }

    /// Annual peak discharges, indexed by `peak_dt`.
    pub async fn peaks(&self, site: &str) -> Result<TimeSeriesTable> {
        let site = check_site(site)?;
        let request = self.config.peaks(site);
        let table = self
            .fetch_table(Dataset::Peaks, site, &request, &self.options)
            .await?;
        TimeSeriesTable::from_table(table, "peak_dt")
    }

    /// Most recent expanded shift-adjusted rating with columns
    /// `stage, shift, discharge, stor`.
    pub async fn rating_curve(&self, site: &str) -> Result<Table> {
        let site = check_site(site)?;
        let request = self.config.rating_curve(site);
        let table = self
            .fetch_table(Dataset::RatingCurve, site, &request, &self.options)
            .await?;
        rating_columns(table)
    }

    /// Statistics for one or more sites.
    ///
    /// `extra` holds further service parameters such as `parameterCd`,
    /// `statYearType` or `missingData`; they override the defaults.
    pub async fn stats<S: AsRef<str>>(
        &self,
        sites: &[S],
        report_type: StatReportType,
        extra: &[(String, String)],
    ) -> Result<Table> {
        let sites = join_sites(sites)?;
        let request = self.config.statistics(&sites, report_type, extra);
        self.fetch_table(Dataset::Statistics, &sites, &request, &self.options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_site_fails_before_request() {
        let config = ClientConfig {
            statistics_url: "http://127.0.0.1:9/stat/".to_string(),
            ..ClientConfig::default()
        };
        let client = NwisClient::new(config).unwrap();
        assert!(matches!(
            client.peaks("  ").await,
            Err(NwisError::InvalidSite(_))
        ));
        assert!(matches!(
            client
                .stats::<&str>(&[], StatReportType::Daily, &[])
                .await,
            Err(NwisError::InvalidSite(_))
        ));
    }

    #[test]
    fn test_parse_options_carry_through() {
        let client = NwisClient::new(ClientConfig::default())
            .unwrap()
            .with_parse_options(ParseOptions::default().max_lines(10));
        assert_eq!(client.options.max_lines, Some(10));
        assert_eq!(client.config().peaks_url, crate::dataset::PEAKS_URL);
    }

    // measurement_dt arrives with a date hint but holds a time of day
    const FIELD_DATE_HINT: &str = "# measurements\n\
agency_cd\tsite_no\tmeasurement_dt\tgage_height_va\n\
5s\t15s\t19d\t12s\n\
USGS\t01546500\t1962-10-24 10:30:00\t1.95\n\
USGS\t01546500\t\t2.10\n";

    #[test]
    fn test_field_measurement_options_keep_timestamps() {
        let client = NwisClient::new(ClientConfig::default()).unwrap();
        assert!(matches!(
            read_rdb_with(FIELD_DATE_HINT, &ParseOptions::default()),
            Err(crate::error::FormatError::CellTypeMismatch { row: 0, .. })
        ));
        let table = read_rdb_with(FIELD_DATE_HINT, &client.field_measurement_options()).unwrap();
        let series = TimeSeriesTable::from_table(table, FIELD_MEASUREMENT_INDEX).unwrap();
        assert_eq!(
            series.index,
            vec![
                chrono::NaiveDate::from_ymd_opt(1962, 10, 24).and_then(|d| d.and_hms_opt(10, 30, 0)),
                None
            ]
        );
    }
}
