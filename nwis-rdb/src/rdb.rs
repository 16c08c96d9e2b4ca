//! Entry point for turning RDB text into a typed [`Table`].

use crate::{
    error::FormatError,
    options::ParseOptions,
    splitter::split_with,
    table::{build_with, Table},
};

/// Parse a complete RDB document with default options.
pub fn read_rdb(text: &str) -> Result<Table, FormatError> {
    read_rdb_with(text, &ParseOptions::default())
}

/// Parse a complete RDB document.
pub fn read_rdb_with(text: &str, options: &ParseOptions) -> Result<Table, FormatError> {
    let sections = split_with(text, options)?;
    let table = build_with(sections.names, sections.hints, &sections.data, options)?;
    Ok(table.with_header(sections.header))
}
