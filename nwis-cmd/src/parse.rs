//! Parse a local RDB file.

use crate::OutputArgs;
use anyhow::Context;
use log::info;
use nwis_rdb::{read_rdb_with, Table};

/// Describe a table: header size, each column with its hint and effective
/// type, and the row count.
pub fn summarize(table: &Table) -> String {
    let mut out = format!(
        "header lines: {}\ncolumns: {}\n",
        table.header().len(),
        table.names().len()
    );
    for ((name, hint), column_type) in table.columns().iter().zip(table.types()) {
        out.push_str(&format!("  {name:<24} {hint:<6} {column_type}\n"));
    }
    out.push_str(&format!("rows: {}\n", table.len()));
    out
}

pub fn run_parse(input: &str, summary: bool, output: &OutputArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))?;
    let table = read_rdb_with(&text, &output.parse_options())
        .with_context(|| format!("failed to parse {input}"))?;
    info!("Parsed {} rows from {}", table.len(), input);
    if summary {
        print!("{}", summarize(&table));
        return Ok(());
    }
    output.emit(&table, |w| Ok(table.write_csv(w)?))
}
