use crate::{
    cell::Cell,
    column::{resolve_type, ColumnSpec, ColumnType},
    error::FormatError,
    options::ParseOptions,
};
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use log::debug;
use serde::Serialize;
use std::{io, ops::Index};

/// One data row. Cells are aligned with the table's `ColumnSpec`.
#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(transparent)]
pub struct Row(Vec<Cell>);

impl Row {
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.0.iter()
    }
}

impl Index<usize> for Row {
    type Output = Cell;

    fn index(&self, index: usize) -> &Cell {
        &self.0[index]
    }
}

/// A parsed RDB document.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Table {
    header: Vec<String>,
    columns: ColumnSpec,
    types: Vec<ColumnType>,
    rows: Vec<Row>,
}

/// A whitespace-only line is skipped, not read as a row. In a one-column
/// table this means an empty field never produces a `Missing` row.
fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).map_or(true, |f| f.trim().is_empty())
}

/// Build a typed table from the column rows and the tab-delimited data block.
pub fn build(names: Vec<String>, hints: Vec<String>, data_block: &str) -> Result<Table, FormatError> {
    build_with(names, hints, data_block, &ParseOptions::default())
}

/// Build a typed table, parsing date columns with `options.date_format`.
pub fn build_with(
    names: Vec<String>,
    hints: Vec<String>,
    data_block: &str,
    options: &ParseOptions,
) -> Result<Table, FormatError> {
    let columns = ColumnSpec::new(names, hints)?;
    let expected = columns.len();

    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(data_block.as_bytes());

    let mut records: Vec<StringRecord> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        if record.len() != expected {
            // the reader skips empty lines, so count newlines up to the record
            let line_index = record.position().map_or(records.len(), |p| {
                let start = (p.byte() as usize).min(data_block.len());
                data_block.as_bytes()[..start]
                    .iter()
                    .filter(|b| **b == b'\n')
                    .count()
            });
            return Err(FormatError::RowArity {
                line_index,
                expected,
                found: record.len(),
            });
        }
        records.push(record);
    }

    // integer detection needs the whole column before anything is converted
    let types: Vec<ColumnType> = columns
        .iter()
        .enumerate()
        .map(|(idx, (name, hint))| {
            if options.text_columns.iter().any(|c| c == name) {
                return ColumnType::String;
            }
            resolve_type(name, hint, records.iter().map(|r| r.get(idx).unwrap_or("")))
        })
        .collect();
    debug!(
        "resolved column types: {}",
        columns
            .names()
            .iter()
            .zip(types.iter())
            .map(|(n, t)| format!("{n}={t}"))
            .collect::<Vec<String>>()
            .join(", ")
    );

    let mut rows = Vec::with_capacity(records.len());
    for (row_idx, record) in records.iter().enumerate() {
        let mut cells = Vec::with_capacity(expected);
        for (col_idx, field) in record.iter().enumerate() {
            let cell = Cell::parse(field, types[col_idx], &options.date_format).ok_or_else(|| {
                FormatError::CellTypeMismatch {
                    row: row_idx,
                    column: columns.names()[col_idx].clone(),
                    value: field.to_string(),
                }
            })?;
            cells.push(cell);
        }
        rows.push(Row(cells));
    }

    Ok(Table {
        header: Vec::new(),
        columns,
        types,
        rows,
    })
}

impl Table {
    /// Attach the comment lines of the source document.
    pub fn with_header(mut self, header: Vec<String>) -> Table {
        self.header = header;
        self
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn columns(&self) -> &ColumnSpec {
        &self.columns
    }

    pub fn names(&self) -> &[String] {
        self.columns.names()
    }

    pub fn hints(&self) -> &[String] {
        self.columns.hints()
    }

    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.index_of(name)
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column_index(name).map(|idx| self.types[idx])
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row.0[idx]))
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&Cell> {
        let idx = self.column_index(name)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Replace every column name. The new list must match the column count.
    pub fn rename_columns(&mut self, names: &[&str]) -> Result<(), FormatError> {
        if names.len() != self.columns.len() {
            return Err(FormatError::ColumnCountMismatch {
                names: names.len(),
                hints: self.columns.len(),
            });
        }
        self.columns
            .set_names(names.iter().map(|n| n.to_string()).collect());
        Ok(())
    }

    /// Remove a column, returning its cells in row order.
    pub fn take_column(&mut self, name: &str) -> Option<Vec<Cell>> {
        let idx = self.column_index(name)?;
        let mut names = self.columns.names().to_vec();
        let mut hints = self.columns.hints().to_vec();
        names.remove(idx);
        hints.remove(idx);
        self.columns = ColumnSpec::new(names, hints).ok()?;
        self.types.remove(idx);
        Some(self.rows.iter_mut().map(|row| row.0.remove(idx)).collect())
    }

    /// Write the table as comma-separated text with a header row.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);
        wtr.write_record(self.names())?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_types_and_cells() {
        let data = "USGS\t01546500\t2020-01-01\t123\t1.5\nUSGS\t01546500\t\t\t";
        let table = build(
            strings(&["agency_cd", "site_no", "datetime", "count_nu", "mean_va"]),
            strings(&["5s", "15s", "20d", "6n", "12n"]),
            data,
        )
        .unwrap();
        assert_eq!(
            table.types(),
            &[
                ColumnType::String,
                ColumnType::String,
                ColumnType::Date,
                ColumnType::Integer,
                ColumnType::Float
            ]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get(0, "site_no"),
            Some(&Cell::String("01546500".to_string()))
        );
        assert_eq!(
            table.get(0, "datetime"),
            NaiveDate::from_ymd_opt(2020, 1, 1).map(Cell::Date).as_ref()
        );
        assert_eq!(table.get(0, "count_nu"), Some(&Cell::Integer(123)));
        assert_eq!(table.get(0, "mean_va"), Some(&Cell::Float(1.5)));
        assert_eq!(table.get(1, "datetime"), Some(&Cell::Missing));
        assert_eq!(table.get(1, "count_nu"), Some(&Cell::Missing));
        assert_eq!(table.get(1, "mean_va"), Some(&Cell::Missing));
    }

    #[test]
    fn test_build_row_arity() {
        let err = build(
            strings(&["a", "b"]),
            strings(&["5s", "5s"]),
            "x\ty\nx",
        )
        .unwrap_err();
        assert_eq!(
            err,
            FormatError::RowArity {
                line_index: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_build_column_count_mismatch() {
        let err = build(strings(&["a", "b"]), strings(&["5s"]), "").unwrap_err();
        assert_eq!(err, FormatError::ColumnCountMismatch { names: 2, hints: 1 });
    }

    #[test]
    fn test_build_cell_type_mismatch() {
        let err = build(
            strings(&["station", "discharge_va"]),
            strings(&["5s", "8n"]),
            "a\t12\nb\tunkn",
        )
        .unwrap_err();
        assert_eq!(
            err,
            FormatError::CellTypeMismatch {
                row: 1,
                column: "discharge_va".to_string(),
                value: "unkn".to_string()
            }
        );

        let err = build(strings(&["peak_dt"]), strings(&["10d"]), "1902-00-00").unwrap_err();
        assert!(matches!(err, FormatError::CellTypeMismatch { row: 0, .. }));
    }

    #[test]
    fn test_build_skips_blank_lines() {
        let table = build(strings(&["a", "b"]), strings(&["5s", "5n"]), "x\t1\n\n   \ny\t2\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "b"), Some(&Cell::Integer(2)));
    }

    #[test]
    fn test_row_arity_counts_empty_lines() {
        let err = build(strings(&["a", "b"]), strings(&["5s", "5s"]), "x\ty\n\nx\n").unwrap_err();
        assert_eq!(
            err,
            FormatError::RowArity {
                line_index: 2,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_single_column_blank_line_is_skipped() {
        let table = build(strings(&["q"]), strings(&["8n"]), "1\n\n  \n2\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "q"), Some(&Cell::Integer(2)));
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        for value in ["NaN", "inf", "-infinity"] {
            let data = format!("1.5\n{value}");
            let err = build(strings(&["mean_va"]), strings(&["8n"]), &data).unwrap_err();
            assert_eq!(
                err,
                FormatError::CellTypeMismatch {
                    row: 1,
                    column: "mean_va".to_string(),
                    value: value.to_string()
                }
            );
        }
    }

    #[test]
    fn test_text_column_override() {
        let options = ParseOptions::default().text_column("measurement_dt");
        let table = build_with(
            strings(&["measurement_dt", "count_nu"]),
            strings(&["19d", "5n"]),
            "1962-10-24 10:30:00\t4",
            &options,
        )
        .unwrap();
        assert_eq!(table.column_type("measurement_dt"), Some(ColumnType::String));
        assert_eq!(table.column_type("count_nu"), Some(ColumnType::Integer));
        assert_eq!(
            table.get(0, "measurement_dt"),
            Some(&Cell::String("1962-10-24 10:30:00".into()))
        );
    }

    #[test]
    fn test_build_with_date_format() {
        let options = ParseOptions::default().date_format("%Y%m%d");
        let table = build_with(strings(&["day"]), strings(&["8d"]), "20200102", &options).unwrap();
        assert_eq!(
            table.get(0, "day"),
            NaiveDate::from_ymd_opt(2020, 1, 2).map(Cell::Date).as_ref()
        );
    }

    #[test]
    fn test_rename_and_take_column() {
        let mut table = build(
            strings(&["INDEP", "SHIFT", "DEP", "STOR"]),
            strings(&["16N", "16N", "16N", "1S"]),
            "1.0\t0.0\t10.5\t*\n1.1\t0.0\t12.25\t",
        )
        .unwrap();
        assert!(table.rename_columns(&["stage", "shift"]).is_err());
        table
            .rename_columns(&["stage", "shift", "discharge", "stor"])
            .unwrap();
        assert_eq!(table.names(), &strings(&["stage", "shift", "discharge", "stor"])[..]);
        assert_eq!(table.column_type("discharge"), Some(ColumnType::Float));

        let stage = table.take_column("stage").unwrap();
        assert_eq!(stage, vec![Cell::Float(1.0), Cell::Float(1.1)]);
        assert_eq!(table.names().len(), 3);
        assert_eq!(table.rows()[0].len(), 3);
        assert_eq!(table.get(1, "stor"), Some(&Cell::String(String::new())));
    }

    #[test]
    fn test_write_csv() {
        let table = build(strings(&["site_no", "count_nu"]), strings(&["15s", "5n"]), "01\t3\n02\t").unwrap();
        let mut out: Vec<u8> = Vec::new();
        table.write_csv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "site_no,count_nu\n01,3\n02,\n");
    }
}
