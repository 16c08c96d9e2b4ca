use crate::column::ColumnType;
use crate::options::DATE_FORMAT;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// One typed value of an RDB table.
///
/// `Missing` only ever appears in integer, float and date columns. An empty
/// field in a string column is `String("")`.
#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(untagged)]
pub enum Cell {
    String(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    Missing,
}

impl Cell {
    /// Convert a raw field to a cell of the given column type.
    ///
    /// Returns `None` when a non-empty field does not parse.
    pub fn parse(raw: &str, column_type: ColumnType, date_format: &str) -> Option<Cell> {
        let value = raw.trim();
        match column_type {
            ColumnType::String => Some(Cell::String(raw.to_string())),
            _ if value.is_empty() => Some(Cell::Missing),
            ColumnType::Integer => value.parse::<i64>().ok().map(Cell::Integer),
            ColumnType::Float => value
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Cell::Float),
            ColumnType::Date => NaiveDate::parse_from_str(value, date_format)
                .ok()
                .map(Cell::Date),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value of the cell; integers widen to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::String(s) => f.write_str(s),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(x) => write!(f, "{x}"),
            Cell::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Cell::Missing => Ok(()),
        }
    }
}
