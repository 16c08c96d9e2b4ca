//! Retrieval commands for the NWIS RDB datasets.

use crate::OutputArgs;
use anyhow::Context;
use clap::Args;
use log::info;
use nwis_rdb::{
    client::NwisClient,
    dataset::{ClientConfig, StatReportType},
    error::NwisError,
    series::TimeSeriesTable,
    Table,
};
use std::time::Duration;

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl FetchArgs {
    pub fn client(&self) -> anyhow::Result<NwisClient> {
        let config = ClientConfig {
            timeout: Duration::from_secs(self.timeout),
            ..ClientConfig::default()
        };
        let client = NwisClient::new(config)
            .context("failed to build HTTP client")?
            .with_parse_options(self.output.parse_options());
        Ok(client)
    }
}

/// Turn a non-200 reply into an error carrying the service's own message.
fn explain(err: NwisError) -> anyhow::Error {
    match err {
        NwisError::Status { status, body } => {
            anyhow::anyhow!("USGS returned an error code of {status}:\n{body}")
        }
        other => other.into(),
    }
}

fn write_series(series: &TimeSeriesTable, output: &OutputArgs) -> anyhow::Result<()> {
    info!("{} rows indexed by {}", series.len(), series.index_name);
    output.emit(series, |w| Ok(series.write_csv(w)?))
}

fn write_table(table: &Table, output: &OutputArgs) -> anyhow::Result<()> {
    info!("{} rows x {} columns", table.len(), table.names().len());
    output.emit(table, |w| Ok(table.write_csv(w)?))
}

pub async fn run_field_measurements(site: &str, args: &FetchArgs) -> anyhow::Result<()> {
    let series = args
        .client()?
        .field_measurements(site)
        .await
        .map_err(explain)
        .with_context(|| format!("field measurements for site {site}"))?;
    write_series(&series, &args.output)
}

pub async fn run_peaks(site: &str, args: &FetchArgs) -> anyhow::Result<()> {
    let series = args
        .client()?
        .peaks(site)
        .await
        .map_err(explain)
        .with_context(|| format!("annual peaks for site {site}"))?;
    write_series(&series, &args.output)
}

pub async fn run_rating_curve(site: &str, args: &FetchArgs) -> anyhow::Result<()> {
    let table = args
        .client()?
        .rating_curve(site)
        .await
        .map_err(explain)
        .with_context(|| format!("rating curve for site {site}"))?;
    write_table(&table, &args.output)
}

pub async fn run_stats(
    sites: &[String],
    report_type: StatReportType,
    params: &[(String, String)],
    args: &FetchArgs,
) -> anyhow::Result<()> {
    let table = args
        .client()?
        .stats(sites, report_type, params)
        .await
        .map_err(explain)
        .with_context(|| format!("{report_type} statistics for {}", sites.join(",")))?;
    write_table(&table, &args.output)
}
