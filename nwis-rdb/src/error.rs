/// Error types for RDB parsing and NWIS retrieval
use thiserror::Error;

/// Structural and data-integrity failures found while parsing an RDB document.
///
/// Every variant is surfaced to the caller; the parser never falls back to a
/// partial table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The column-name row or the type-hint row is absent
    #[error("Truncated RDB document: {0}")]
    TruncatedDocument(&'static str),

    /// Column-name row and type-hint row disagree on field count
    #[error("Column count mismatch: {names} column names but {hints} type hints")]
    ColumnCountMismatch { names: usize, hints: usize },

    /// A data row does not have one field per column
    #[error("Data line {line_index} has {found} fields, expected {expected}")]
    RowArity {
        line_index: usize,
        expected: usize,
        found: usize,
    },

    /// A cell cannot be parsed as its column's effective type
    #[error("Row {row}, column `{column}`: cannot parse {value:?}")]
    CellTypeMismatch {
        row: usize,
        column: String,
        value: String,
    },

    /// The document exceeds the configured line ceiling
    #[error("RDB document exceeds the limit of {limit} lines")]
    TooLarge { limit: usize },

    /// The tab-delimited reader failed on the data block
    #[error("Failed to read data block: {0}")]
    Csv(String),
}

impl From<csv::Error> for FormatError {
    fn from(err: csv::Error) -> Self {
        FormatError::Csv(err.to_string())
    }
}

/// Errors from fetching and post-processing NWIS datasets.
#[cfg(feature = "api")]
#[derive(Error, Debug)]
pub enum NwisError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with something other than 200 OK
    #[error("NWIS returned status {status}")]
    Status { status: u16, body: String },

    /// The response body is not a well-formed RDB document
    #[error("Failed to parse RDB response: {0}")]
    Format(#[from] FormatError),

    /// A column required by post-processing is absent
    #[error("Column not found: {0}")]
    MissingColumn(String),

    /// A value could not be turned into a timestamp
    #[error("Row {row}: cannot parse timestamp {value:?}")]
    Timestamp { row: usize, value: String },

    /// Rename list does not match the table's columns
    #[error("Expected {expected} columns, table has {found}")]
    ColumnArity { expected: usize, found: usize },

    /// Invalid site identifier
    #[error("Invalid site id: {0}")]
    InvalidSite(String),
}

/// Type alias for Results using NwisError
#[cfg(feature = "api")]
pub type Result<T> = std::result::Result<T, NwisError>;
