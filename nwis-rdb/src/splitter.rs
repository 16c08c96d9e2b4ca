use crate::error::FormatError;
use crate::options::ParseOptions;

/// Marker that opens an RDB comment line.
pub const COMMENT_MARKER: char = '#';

/// The four parts of an RDB document, before any typing is applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sections {
    /// Every comment line, verbatim and in document order
    pub header: Vec<String>,
    /// Whitespace-split column-name row
    pub names: Vec<String>,
    /// Whitespace-split type-hint row
    pub hints: Vec<String>,
    /// Data lines joined with `\n`
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Header,
    Dtype,
    Data,
}

fn is_comment(line: &str) -> bool {
    line.starts_with(COMMENT_MARKER)
}

/// Split raw RDB text into header, column names, type hints and data block.
pub fn split(raw_text: &str) -> Result<Sections, FormatError> {
    split_with(raw_text, &ParseOptions::default())
}

/// Split raw RDB text, honouring the line ceiling in `options`.
pub fn split_with(raw_text: &str, options: &ParseOptions) -> Result<Sections, FormatError> {
    let mut sections = Sections::default();
    let mut data_lines: Vec<&str> = Vec::new();
    let mut state = State::Header;

    for (count, line) in raw_text.lines().enumerate() {
        if let Some(limit) = options.max_lines {
            if count >= limit {
                return Err(FormatError::TooLarge { limit });
            }
        }
        // comments are collected in every state
        if is_comment(line) {
            sections.header.push(line.to_string());
            continue;
        }
        match state {
            State::Header => {
                if line.trim().is_empty() {
                    continue;
                }
                sections.names = line.split_whitespace().map(String::from).collect();
                state = State::Dtype;
            }
            State::Dtype => {
                sections.hints = line.split_whitespace().map(String::from).collect();
                state = State::Data;
            }
            State::Data => data_lines.push(line),
        }
    }

    match state {
        State::Header => Err(FormatError::TruncatedDocument("missing column-name row")),
        State::Dtype => Err(FormatError::TruncatedDocument("missing type-hint row")),
        State::Data => {
            sections.data = data_lines.join("\n");
            log::debug!(
                "split RDB document: {} header lines, {} columns, {} data lines",
                sections.header.len(),
                sections.names.len(),
                data_lines.len()
            );
            Ok(sections)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# comment line\n#\nagency_cd\tsite_no\tdatetime\n5s\t15s\t20d\nUSGS\t01546500\t2020-01-01\nUSGS\t01546500\t2020-01-02\n";

    #[test]
    fn test_split_sections() {
        let sections = split(DOC).unwrap();
        assert_eq!(sections.header, vec!["# comment line", "#"]);
        assert_eq!(sections.names, vec!["agency_cd", "site_no", "datetime"]);
        assert_eq!(sections.hints, vec!["5s", "15s", "20d"]);
        assert_eq!(
            sections.data,
            "USGS\t01546500\t2020-01-01\nUSGS\t01546500\t2020-01-02"
        );
    }

    #[test]
    fn test_split_empty_input() {
        assert!(matches!(
            split(""),
            Err(FormatError::TruncatedDocument(_))
        ));
    }

    #[test]
    fn test_split_header_only() {
        assert!(matches!(
            split("# one\n# two\n"),
            Err(FormatError::TruncatedDocument(_))
        ));
    }

    #[test]
    fn test_split_missing_hint_row() {
        assert_eq!(
            split("# one\nagency_cd\tsite_no\n"),
            Err(FormatError::TruncatedDocument("missing type-hint row"))
        );
    }

    #[test]
    fn test_split_zero_data_rows() {
        let sections = split("a\tb\n5s\t5s\n").unwrap();
        assert_eq!(sections.names.len(), 2);
        assert!(sections.data.is_empty());
    }

    #[test]
    fn test_split_late_comment_goes_to_header() {
        let sections = split("# top\na\n5s\n1\n# trailer\n2").unwrap();
        assert_eq!(sections.header, vec!["# top", "# trailer"]);
        assert_eq!(sections.data, "1\n2");
    }

    #[test]
    fn test_split_crlf() {
        let sections = split("#h\r\na\tb\r\n5s\t5n\r\nx\t1\r\n").unwrap();
        assert_eq!(sections.header, vec!["#h"]);
        assert_eq!(sections.hints, vec!["5s", "5n"]);
        assert_eq!(sections.data, "x\t1");
    }

    #[test]
    fn test_split_line_limit() {
        let options = ParseOptions::default().max_lines(3);
        assert_eq!(
            split_with(DOC, &options),
            Err(FormatError::TooLarge { limit: 3 })
        );
        assert!(split_with(DOC, &ParseOptions::default().max_lines(6)).is_ok());
    }
}
