//! Source preparation
//!
//!     The lexer expects text that ends with the end-of-input marker and has no runs of
//!     blank lines, since a blank line inside a block would read as a dedent to column 0.
//!     Callers that read files from disk run them through [`prepare_source`] first.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::yapl::config::InputConfig;

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n( *\n)+").unwrap());

/// Normalize line endings, collapse blank lines and append `"\n" + eof_marker`.
pub fn prepare_source(text: &str, input: &InputConfig) -> String {
    let mut prepared = if input.normalize_line_endings {
        text.replace("\r\n", "\n")
    } else {
        text.to_string()
    };
    if input.strip_blank_lines {
        prepared = BLANK_LINES.replace_all(&prepared, "\n").into_owned();
    }
    prepared.push('\n');
    prepared.push_str(&input.eof_marker);
    prepared
}
