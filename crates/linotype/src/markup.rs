//! Markup for item content.
//!
//! Manual markup comes from `**strong**` and `*emphasized*` delimiters in
//! the item text. Automatic markup applies to definitions: the term is
//! strong, every argument name in the argument string is emphasized, and
//! so is every mention of an argument name in the description.
//!
//! Content is kept as [`Span`]s until the last moment so that wrapping
//! measures visible text only. Terminal output paints each line
//! separately, so a styled run that crosses a line break is closed at the
//! end of one line and reopened on the next.

use std::ops::Range;

use linotype_markup::{
    parse_spans, plain_text, push_span, render_spans, MarkupStyles, Span, SpanKind,
};
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_width::UnicodeWidthStr;

use crate::formatter::Formatter;
use crate::wrap::{break_lines, spaces};

/// Argument names within an argument string.
static ARGUMENT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w-]+").expect("argument name pattern is valid"));

/// A whitespace-free run of styled text.
pub type Word = Vec<Span>;

/// Marked-up parts of a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionSpans {
    /// The term and argument string joined by a space.
    pub signature: Vec<Span>,
    pub description: Vec<Span>,
}

/// Applies markup to a text and returns the rendered string along with
/// its visible width.
///
/// ```rust
/// use linotype::{apply_markup, Formatter};
///
/// let (rendered, width) = apply_markup("a **b** c", &Formatter::ansi());
/// assert_eq!(rendered, "a \x1b[1mb\x1b[0m c");
/// assert_eq!(width, 5);
/// ```
pub fn apply_markup(text: &str, formatter: &Formatter) -> (String, usize) {
    let spans = text_spans(text, formatter);
    let width = plain_text(&spans).width();
    (render_spans(&spans, &formatter.markup_styles()), width)
}

/// Parses manual markup in a text when the formatter enables it.
pub fn text_spans(text: &str, formatter: &Formatter) -> Vec<Span> {
    if formatter.manual_markup {
        parse_spans(text)
    } else {
        let mut spans = Vec::new();
        push_span(&mut spans, SpanKind::Plain, text);
        spans
    }
}

/// Applies manual and automatic markup to the parts of a definition.
pub fn definition_spans(
    term: &str,
    args: &str,
    description: &str,
    formatter: &Formatter,
) -> DefinitionSpans {
    let mut term_spans = text_spans(term, formatter);
    let mut args_spans = text_spans(args, formatter);
    let mut description_spans = text_spans(description, formatter);

    if formatter.auto_markup {
        term_spans = term_spans
            .into_iter()
            .map(|span| Span::new(span.kind.with_strong(), span.text))
            .collect();

        let args_text = plain_text(&args_spans);
        let names: Vec<Range<usize>> = ARGUMENT_NAME
            .find_iter(&args_text)
            .map(|m| m.range())
            .collect();
        args_spans = emphasize(&args_spans, &names);

        let mentions = argument_mentions(&args_text, &plain_text(&description_spans));
        description_spans = emphasize(&description_spans, &mentions);
    }

    let mut signature = Vec::new();
    for span in &term_spans {
        push_span(&mut signature, span.kind, &span.text);
    }
    if !args.is_empty() {
        push_span(&mut signature, SpanKind::Plain, " ");
        for span in &args_spans {
            push_span(&mut signature, span.kind, &span.text);
        }
    }

    DefinitionSpans {
        signature,
        description: description_spans,
    }
}

/// The visible width of a definition's term and argument string joined
/// by a space.
pub fn signature_width(term: &str, args: &str, formatter: &Formatter) -> usize {
    let term = plain_text(&text_spans(term, formatter)).width();
    if args.is_empty() {
        term
    } else {
        term + 1 + plain_text(&text_spans(args, formatter)).width()
    }
}

/// Finds every occurrence of an argument name in `text` that is not part
/// of a longer word.
fn argument_mentions(args: &str, text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    for name in ARGUMENT_NAME.find_iter(args).map(|m| m.as_str()) {
        for (start, found) in text.match_indices(name) {
            let end = start + found.len();
            let before = text[..start].chars().next_back();
            let after = text[end..].chars().next();
            if !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char) {
                ranges.push(start..end);
            }
        }
    }
    ranges
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Adds emphasis to the given byte ranges of the spans' plain text.
fn emphasize(spans: &[Span], ranges: &[Range<usize>]) -> Vec<Span> {
    if ranges.is_empty() {
        return spans.to_vec();
    }

    let mut output = Vec::new();
    let mut offset = 0;
    for span in spans {
        let mut run_start = 0;
        let mut run_emphasized = false;
        for (i, _) in span.text.char_indices() {
            let emphasized = ranges.iter().any(|r| r.contains(&(offset + i)));
            if i > 0 && emphasized != run_emphasized {
                push_run(&mut output, span, run_start..i, run_emphasized);
                run_start = i;
            }
            run_emphasized = emphasized;
        }
        push_run(&mut output, span, run_start..span.text.len(), run_emphasized);
        offset += span.text.len();
    }
    output
}

fn push_run(output: &mut Vec<Span>, span: &Span, range: Range<usize>, emphasized: bool) {
    let kind = if emphasized {
        span.kind.with_emphasis()
    } else {
        span.kind
    };
    push_span(output, kind, &span.text[range]);
}

/// Splits spans into words at whitespace. Styles are kept per fragment.
pub fn styled_words(spans: &[Span]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Word = Vec::new();
    for span in spans {
        let mut rest = span.text.as_str();
        while !rest.is_empty() {
            match rest.find(char::is_whitespace) {
                Some(0) => {
                    if !current.is_empty() {
                        words.push(std::mem::take(&mut current));
                    }
                    rest = rest.trim_start();
                }
                Some(end) => {
                    push_span(&mut current, span.kind, &rest[..end]);
                    rest = &rest[end..];
                }
                None => {
                    push_span(&mut current, span.kind, rest);
                    rest = "";
                }
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// The visible width of a word.
pub fn word_width(word: &[Span]) -> usize {
    word.iter().map(|span| span.text.width()).sum()
}

/// Paints words joined by single spaces.
///
/// A space between two words that share a style at their junction takes
/// that style, so an emphasized phrase reads as one run.
pub fn paint_words(words: &[Word], styles: &MarkupStyles) -> String {
    let mut line = Vec::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            let left = words[i - 1].last().map(|s| s.kind);
            let right = word.first().map(|s| s.kind);
            let kind = match (left, right) {
                (Some(l), Some(r)) if l == r => l,
                _ => SpanKind::Plain,
            };
            push_span(&mut line, kind, " ");
        }
        for span in word {
            push_span(&mut line, span.kind, &span.text);
        }
    }
    render_spans(&line, styles)
}

/// Wraps styled text. Lines include their indentation.
pub fn wrap_spans(
    spans: &[Span],
    styles: &MarkupStyles,
    width: usize,
    first_indent: usize,
    hanging_indent: usize,
) -> Vec<String> {
    let words = styled_words(spans);
    let widths: Vec<usize> = words.iter().map(|w| word_width(w)).collect();
    break_lines(&widths, width, first_indent, hanging_indent)
        .into_iter()
        .enumerate()
        .map(|(i, range)| {
            let indent = if i == 0 { first_indent } else { hanging_indent };
            format!("{}{}", spaces(indent), paint_words(&words[range], styles))
        })
        .collect()
}
