//! Logical line splitting and delimiter detection

/// A trimmed, non-empty line. `number` is 1-based over non-empty lines,
/// so the header is always line 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Split a document into trimmed, non-empty lines.
///
/// `\n`, `\r\n` and bare `\r` are all treated as line breaks.
pub fn split_lines(text: &str) -> Vec<LogicalLine<'_>> {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| LogicalLine {
            number: i + 1,
            text: line,
        })
        .collect()
}

/// Pick the field delimiter for the whole document from its header line
pub fn detect_delimiter(header: &str) -> char {
    if header.contains(';') {
        ';'
    } else {
        ','
    }
}
