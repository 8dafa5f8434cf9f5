//! ANSI-aware text measurement and line wrapping.
//!
//! Widths are terminal columns: escape sequences count as zero and wide
//! characters count as two.

use std::ops::Range;

use console::{measure_text_width, pad_str, Alignment};

/// Returns the display width of a string, ignoring ANSI escape codes.
///
/// ```rust
/// use linotype::display_width;
///
/// assert_eq!(display_width("hello"), 5);
/// assert_eq!(display_width("\x1b[31mred\x1b[0m"), 3);
/// assert_eq!(display_width("日本"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    measure_text_width(s)
}

/// Pads a string on the right to reach the target display width.
///
/// Strings that are already wider are returned unchanged.
///
/// ```rust
/// use linotype::pad_right;
///
/// assert_eq!(pad_right("-q", 5), "-q   ");
/// assert_eq!(pad_right("--verbose", 3), "--verbose");
/// ```
pub fn pad_right(s: &str, width: usize) -> String {
    pad_str(s, width, Alignment::Left, None).into_owned()
}

/// Splits pre-measured words into lines.
///
/// The first line starts at column `first_indent`, every other line at
/// `hanging_indent`. Words are separated by a single column. Returns the
/// range of words on each line.
///
/// A word that does not fit on an empty line is placed there anyway and
/// the line is closed after it.
pub fn break_lines(
    widths: &[usize],
    width: usize,
    first_indent: usize,
    hanging_indent: usize,
) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut column = first_indent;

    for (i, &word) in widths.iter().enumerate() {
        if i == start {
            column += word;
            continue;
        }
        if column + 1 + word <= width {
            column += 1 + word;
        } else {
            lines.push(start..i);
            start = i;
            column = hanging_indent + word;
        }
    }

    if start < widths.len() {
        lines.push(start..widths.len());
    }
    lines
}

/// Wraps a single logical line of text.
///
/// Lines include their indentation. Runs of whitespace collapse to one
/// separator and no line has trailing whitespace. Empty input yields no
/// lines.
///
/// ```rust
/// use linotype::wrap;
///
/// let lines = wrap("Suppress all non-error output.", 20, 2, 4);
/// assert_eq!(lines, vec!["  Suppress all", "    non-error", "    output."]);
/// ```
pub fn wrap(text: &str, width: usize, first_indent: usize, hanging_indent: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let widths: Vec<usize> = words.iter().map(|w| display_width(w)).collect();

    break_lines(&widths, width, first_indent, hanging_indent)
        .into_iter()
        .enumerate()
        .map(|(i, range)| {
            let indent = if i == 0 { first_indent } else { hanging_indent };
            format!("{}{}", spaces(indent), words[range].join(" "))
        })
        .collect()
}

pub(crate) fn spaces(n: usize) -> String {
    " ".repeat(n)
}
