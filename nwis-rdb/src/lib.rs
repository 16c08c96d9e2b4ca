//! Reader for the USGS RDB tab-delimited format, with an optional client for
//! the NWIS services that publish it.

pub mod cell;
pub mod column;
pub mod error;
pub mod options;
pub mod rdb;
pub mod splitter;
pub mod table;

#[cfg(feature = "api")]
pub mod client;
#[cfg(feature = "api")]
pub mod dataset;
#[cfg(feature = "api")]
pub mod series;

pub use cell::Cell;
pub use column::{ColumnSpec, ColumnType};
pub use error::FormatError;
pub use options::ParseOptions;
pub use rdb::{read_rdb, read_rdb_with};
pub use table::{Row, Table};
