//! Command implementations for the NWIS CLI.
//!
//! Provides subcommands for parsing local RDB files and for retrieving the
//! field measurement, peak, rating curve and statistics datasets.

use clap::{Args, Subcommand, ValueEnum};
use nwis_rdb::{dataset::StatReportType, options::DATE_FORMAT, ParseOptions};
use serde::Serialize;
use std::{fs::File, io, io::Write};

pub mod fetch;
pub mod parse;

/// Output encoding for parsed tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Options shared by every command that produces a table.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Write the table to this path instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Output encoding
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Reject RDB documents longer than this many lines
    #[arg(long)]
    pub max_lines: Option<usize>,

    /// chrono format string for date-hinted columns
    #[arg(long, default_value = DATE_FORMAT)]
    pub date_format: String,
}

impl OutputArgs {
    pub fn parse_options(&self) -> ParseOptions {
        let options = ParseOptions::default().date_format(self.date_format.clone());
        match self.max_lines {
            Some(limit) => options.max_lines(limit),
            None => options,
        }
    }

    fn writer(&self) -> anyhow::Result<Box<dyn Write>> {
        Ok(match &self.output {
            Some(path) => Box::new(File::create(path)?),
            None => Box::new(io::stdout().lock()),
        })
    }

    /// Write `value` as JSON, or hand the writer to `csv` for CSV output.
    pub fn emit<T, F>(&self, value: &T, csv: F) -> anyhow::Result<()>
    where
        T: Serialize,
        F: FnOnce(&mut dyn Write) -> anyhow::Result<()>,
    {
        let mut writer = self.writer()?;
        match self.format {
            OutputFormat::Csv => csv(&mut *writer)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, value)?;
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a local RDB file and describe or convert it
    Parse {
        /// Path to the RDB file
        input: String,

        /// Print the column summary instead of the table
        #[arg(long)]
        summary: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Retrieve field measurements of discharge for a site
    FieldMeasurements {
        /// USGS site number, e.g. 01546500
        site: String,

        #[command(flatten)]
        fetch: fetch::FetchArgs,
    },

    /// Retrieve the annual peak discharge series for a site
    Peaks {
        /// USGS site number
        site: String,

        #[command(flatten)]
        fetch: fetch::FetchArgs,
    },

    /// Retrieve the most recent expanded shift-adjusted rating curve
    RatingCurve {
        /// USGS site number
        site: String,

        #[command(flatten)]
        fetch: fetch::FetchArgs,
    },

    /// Retrieve statistics from the USGS statistics service
    Stats {
        /// One or more USGS site numbers
        #[arg(required = true)]
        sites: Vec<String>,

        /// Report type: daily, monthly or annual
        #[arg(short = 't', long, default_value_t = StatReportType::Daily)]
        report_type: StatReportType,

        /// Extra service parameter, e.g. --param parameterCd=00060
        #[arg(short = 'p', long = "param", value_parser = nwis_rdb::dataset::parse_param)]
        params: Vec<(String, String)>,

        #[command(flatten)]
        fetch: fetch::FetchArgs,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Parse {
            input,
            summary,
            output,
        } => parse::run_parse(&input, summary, &output),
        Command::FieldMeasurements { site, fetch } => {
            fetch::run_field_measurements(&site, &fetch).await
        }
        Command::Peaks { site, fetch } => fetch::run_peaks(&site, &fetch).await,
        Command::RatingCurve { site, fetch } => fetch::run_rating_curve(&site, &fetch).await,
        Command::Stats {
            sites,
            report_type,
            params,
            fetch,
        } => fetch::run_stats(&sites, report_type, &params, &fetch).await,
    }
}
