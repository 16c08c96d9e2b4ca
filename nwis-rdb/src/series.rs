use crate::{
    cell::Cell,
    dataset::RATING_COLUMNS,
    error::{NwisError, Result},
    table::Table,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Formats tried, in order, for timestamp columns held as text.
pub const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// A table whose rows are keyed by a timestamp taken from one of its columns.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct TimeSeriesTable {
    pub index_name: String,
    /// One entry per row; `None` where the source cell was missing
    pub index: Vec<Option<NaiveDateTime>>,
    pub table: Table,
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, crate::options::DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl TimeSeriesTable {
    /// Remove `column` from `table` and use it as the row index.
    pub fn from_table(mut table: Table, column: &str) -> Result<TimeSeriesTable> {
        let cells = table
            .take_column(column)
            .ok_or_else(|| NwisError::MissingColumn(column.to_string()))?;
        let index = cells
            .iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                Cell::Missing => Ok(None),
                Cell::Date(d) => Ok(d.and_hms_opt(0, 0, 0)),
                Cell::String(s) if s.trim().is_empty() => Ok(None),
                Cell::String(s) => parse_timestamp(s).map(Some).ok_or_else(|| {
                    NwisError::Timestamp {
                        row,
                        value: s.clone(),
                    }
                }),
                other => Err(NwisError::Timestamp {
                    row,
                    value: other.to_string(),
                }),
            })
            .collect::<Result<Vec<Option<NaiveDateTime>>>>()?;
        Ok(TimeSeriesTable {
            index_name: column.to_string(),
            index,
            table,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Write the table as CSV with the index as the first column.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> std::result::Result<(), csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        let mut header = vec![self.index_name.clone()];
        header.extend(self.table.names().iter().cloned());
        wtr.write_record(&header)?;
        for (stamp, row) in self.index.iter().zip(self.table.rows()) {
            let mut record =
                vec![stamp.map_or(String::new(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())];
            record.extend(row.iter().map(|cell| cell.to_string()));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Give an expanded rating table its fixed column names.
pub fn rating_columns(mut table: Table) -> Result<Table> {
    let found = table.names().len();
    table
        .rename_columns(&RATING_COLUMNS)
        .map_err(|_| NwisError::ColumnArity {
            expected: RATING_COLUMNS.len(),
            found,
        })?;
    Ok(table)
}
