use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names that always hold identifiers, whatever their hint says.
pub const IDENTIFIER_COLUMNS: [&str; 2] = ["site_no", "parameter_cd"];

/// Suffix marking a code column ("agency_cd", "tz_cd", ...).
pub const CODE_SUFFIX: &str = "_cd";

/// The storage class named by the letter of an RDB type hint.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum HintCode {
    Text,
    Numeric,
    Date,
    Unknown,
}

/// A parsed type hint such as `"16s"`, `"8n"`, `"16N"` or `"d"`.
///
/// The width is descriptive only; fields are tab-delimited, not fixed-width.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct TypeHint {
    pub width: Option<u32>,
    pub code: HintCode,
}

impl TypeHint {
    pub fn parse(hint: &str) -> TypeHint {
        let digits_end = hint
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(hint.len());
        let width = hint[..digits_end].parse::<u32>().ok();
        let code = match hint[digits_end..].chars().next() {
            Some('s') | Some('S') => HintCode::Text,
            Some('n') | Some('N') => HintCode::Numeric,
            Some('d') | Some('D') => HintCode::Date,
            _ => HintCode::Unknown,
        };
        TypeHint { width, code }
    }
}

/// Effective type of a column after the override policy is applied.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Date,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Date => "date",
        };
        f.write_str(name)
    }
}

/// Ordered `(name, type_hint)` pairs from the two RDB header rows.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct ColumnSpec {
    names: Vec<String>,
    hints: Vec<String>,
}

impl ColumnSpec {
    pub fn new(names: Vec<String>, hints: Vec<String>) -> Result<ColumnSpec, FormatError> {
        if names.len() != hints.len() {
            return Err(FormatError::ColumnCountMismatch {
                names: names.len(),
                hints: hints.len(),
            });
        }
        Ok(ColumnSpec { names, hints })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .zip(self.hints.iter())
            .map(|(n, h)| (n.as_str(), h.as_str()))
    }

    pub(crate) fn set_names(&mut self, names: Vec<String>) {
        self.names = names;
    }
}

/// True for `site_no`, `parameter_cd` and any `*_cd` column.
pub fn is_identifier_column(name: &str) -> bool {
    IDENTIFIER_COLUMNS.contains(&name) || name.ends_with(CODE_SUFFIX)
}

/// Resolve a column's effective type.
///
/// `values` are the raw fields of the column; they are only consulted for
/// numeric hints, to choose between integer and float. Empty fields count
/// as missing and do not take part in that choice.
pub fn resolve_type<'a, I>(name: &str, hint: &str, values: I) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    if is_identifier_column(name) {
        return ColumnType::String;
    }
    match TypeHint::parse(hint).code {
        HintCode::Date => ColumnType::Date,
        HintCode::Numeric => {
            let all_integers = values
                .into_iter()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .all(|v| v.parse::<i64>().is_ok());
            if all_integers {
                ColumnType::Integer
            } else {
                ColumnType::Float
            }
        }
        HintCode::Text | HintCode::Unknown => ColumnType::String,
    }
}
