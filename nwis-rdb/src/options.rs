use serde::{Deserialize, Serialize};

/// Date format used for RDB date columns: "YYYY-MM-DD"
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Reject documents with more lines than this. `None` means unbounded.
    pub max_lines: Option<usize>,
    /// chrono format string for date-hinted columns
    pub date_format: String,
    /// Columns kept as text whatever their hint says
    pub text_columns: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_lines: None,
            date_format: DATE_FORMAT.to_string(),
            text_columns: Vec::new(),
        }
    }
}

impl ParseOptions {
    pub fn max_lines(mut self, limit: usize) -> Self {
        self.max_lines = Some(limit);
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn text_column(mut self, name: impl Into<String>) -> Self {
        self.text_columns.push(name.into());
        self
    }
}
