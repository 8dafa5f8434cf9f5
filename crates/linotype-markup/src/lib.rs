//! Inline emphasis markup parser for help-message text.
//!
//! This crate parses the two inline styles supported in help messages:
//!
//! - `**strong**` text, delimited by a doubled asterisk
//! - `*emphasized*` text, delimited by a single asterisk
//!
//! Parsing produces a flat list of [`Span`]s, each carrying a [`SpanKind`]
//! and its text. Spans can be rendered to ANSI escapes through
//! [`console::Style`], flattened back to plain text, or handed to a
//! documentation generator as structured `(kind, text)` pairs.
//!
//! # Example
//!
//! ```rust
//! use linotype_markup::{MarkupParser, MarkupStyles, MarkupTransform};
//! use console::Style;
//!
//! let styles = MarkupStyles::new(
//!     Style::new().bold().force_styling(true),
//!     Style::new().underlined().force_styling(true),
//! );
//!
//! // Apply ANSI codes
//! let parser = MarkupParser::new(styles.clone(), MarkupTransform::Apply);
//! let output = parser.process("a **bold** move");
//! assert!(output.contains("\x1b[1m"));
//!
//! // Strip delimiters (plain text)
//! let parser = MarkupParser::new(styles.clone(), MarkupTransform::Remove);
//! assert_eq!(parser.process("a **bold** move"), "a bold move");
//!
//! // Keep delimiters visible (debug mode)
//! let parser = MarkupParser::new(styles, MarkupTransform::Keep);
//! assert_eq!(parser.process("a **bold** move"), "a **bold** move");
//! ```
//!
//! # Delimiter Rules
//!
//! - An opening delimiter must be followed by a non-whitespace character.
//! - A closing delimiter must be preceded by a non-whitespace character.
//! - Styles do not nest: inside a strong span a single `*` is literal text,
//!   and inside an emphasized span `**` is literal text.
//! - Delimiters without a partner are kept as literal text. Parsing never
//!   fails.

use console::Style;
use serde::Serialize;

/// The style of a run of inline text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// Unstyled text.
    #[default]
    Plain,
    /// Strong text (`**text**`).
    Strong,
    /// Emphasized text (`*text*`).
    Emphasis,
    /// Both strong and emphasized. Only produced when automatic markup
    /// emphasizes a substring of a manually strong span.
    StrongEmphasis,
}

impl SpanKind {
    pub fn is_strong(self) -> bool {
        matches!(self, SpanKind::Strong | SpanKind::StrongEmphasis)
    }

    pub fn is_emphasis(self) -> bool {
        matches!(self, SpanKind::Emphasis | SpanKind::StrongEmphasis)
    }

    /// Returns this kind with the strong style added.
    pub fn with_strong(self) -> Self {
        if self.is_emphasis() {
            SpanKind::StrongEmphasis
        } else {
            SpanKind::Strong
        }
    }

    /// Returns this kind with the emphasis style added.
    pub fn with_emphasis(self) -> Self {
        if self.is_strong() {
            SpanKind::StrongEmphasis
        } else {
            SpanKind::Emphasis
        }
    }
}

/// A run of text sharing one [`SpanKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
}

impl Span {
    pub fn new(kind: SpanKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Plain, text)
    }

    pub fn strong(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Strong, text)
    }

    pub fn emphasis(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Emphasis, text)
    }
}

/// Appends a span, merging it into the previous one when the kinds match.
///
/// Empty text is dropped.
pub fn push_span(spans: &mut Vec<Span>, kind: SpanKind, text: &str) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.kind == kind => last.text.push_str(text),
        _ => spans.push(Span::new(kind, text)),
    }
}

/// How to transform parsed markup in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupTransform {
    /// Apply ANSI escape codes from the associated styles.
    /// Used for terminal output.
    Apply,

    /// Remove the delimiters, outputting only the content.
    /// Used for plain text output.
    Remove,

    /// Keep the delimiters as-is in the output.
    /// Used for debug mode to visualize span structure.
    Keep,
}

/// The styles applied to strong and emphasized spans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkupStyles {
    pub strong: Style,
    pub emphasis: Style,
}

impl MarkupStyles {
    pub fn new(strong: Style, emphasis: Style) -> Self {
        Self { strong, emphasis }
    }

    /// Returns a copy with styling forced on or off regardless of whether
    /// the attached terminal supports it.
    pub fn force_styling(&self, value: bool) -> Self {
        Self {
            strong: self.strong.clone().force_styling(value),
            emphasis: self.emphasis.clone().force_styling(value),
        }
    }

    /// Renders a single span, chaining both styles for
    /// [`SpanKind::StrongEmphasis`].
    pub fn paint(&self, kind: SpanKind, text: &str) -> String {
        match kind {
            SpanKind::Plain => text.to_string(),
            SpanKind::Strong => self.strong.apply_to(text).to_string(),
            SpanKind::Emphasis => self.emphasis.apply_to(text).to_string(),
            SpanKind::StrongEmphasis => {
                let inner = self.emphasis.apply_to(text).to_string();
                self.strong.apply_to(inner).to_string()
            }
        }
    }
}

/// An inline markup parser with a fixed output transform.
#[derive(Debug, Clone)]
pub struct MarkupParser {
    styles: MarkupStyles,
    transform: MarkupTransform,
}

impl MarkupParser {
    /// Creates a new parser with the given styles and transform mode.
    pub fn new(styles: MarkupStyles, transform: MarkupTransform) -> Self {
        Self { styles, transform }
    }

    pub fn transform(&self) -> MarkupTransform {
        self.transform
    }

    /// Parses the input into spans.
    pub fn spans(&self, input: &str) -> Vec<Span> {
        parse_spans(input)
    }

    /// Parses and transforms input according to the configured mode.
    ///
    /// This is the main entry point for parsing marked-up content.
    pub fn process(&self, input: &str) -> String {
        match self.transform {
            MarkupTransform::Apply => render_spans(&parse_spans(input), &self.styles),
            MarkupTransform::Remove => plain_text(&parse_spans(input)),
            MarkupTransform::Keep => input.to_string(),
        }
    }
}

/// Parses `**strong**` and `*emphasized*` markup into spans.
pub fn parse_spans(input: &str) -> Vec<Span> {
    let tokens = Tokenizer::new(input).collect::<Vec<_>>();
    let mut spans = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            Token::Text(text) => push_span(&mut spans, SpanKind::Plain, text),
            Token::Delim(delim) => {
                if let Some(offset) = find_close(&tokens[i + 1..], delim) {
                    let content: String = tokens[i + 1..i + 1 + offset]
                        .iter()
                        .map(Token::as_str)
                        .collect();
                    push_span(&mut spans, delim.kind(), &content);
                    i += offset + 2;
                    continue;
                }
                // No partner - treat as literal text
                push_span(&mut spans, SpanKind::Plain, delim.as_str());
            }
        }
        i += 1;
    }

    spans
}

/// Finds the closing delimiter for an opening one at the start of `tokens`.
///
/// Returns the index of the closing token within `tokens`.
fn find_close(tokens: &[Token], delim: Delimiter) -> Option<usize> {
    // The opening delimiter must touch the content
    match tokens.first() {
        Some(Token::Text(text)) if !text.starts_with(char::is_whitespace) => {}
        _ => return None,
    }

    let mut prev: Option<&str> = None;
    for (i, token) in tokens.iter().enumerate() {
        if let Token::Delim(d) = token {
            if *d == delim {
                if let Some(p) = prev {
                    if !p.ends_with(char::is_whitespace) {
                        return Some(i);
                    }
                }
            }
        }
        prev = Some(token.as_str());
    }
    None
}

/// Concatenates span text, dropping all styling.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

/// Strips markup delimiters from the input.
pub fn strip_markup(input: &str) -> String {
    plain_text(&parse_spans(input))
}

/// Renders spans with ANSI styles.
pub fn render_spans(spans: &[Span], styles: &MarkupStyles) -> String {
    let mut output = String::new();
    for span in spans {
        output.push_str(&styles.paint(span.kind, &span.text));
    }
    output
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    /// `**`
    Strong,
    /// `*`
    Emphasis,
}

impl Delimiter {
    fn as_str(self) -> &'static str {
        match self {
            Delimiter::Strong => "**",
            Delimiter::Emphasis => "*",
        }
    }

    fn kind(self) -> SpanKind {
        match self {
            Delimiter::Strong => SpanKind::Strong,
            Delimiter::Emphasis => SpanKind::Emphasis,
        }
    }
}

/// Token types produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// Text without asterisks.
    Text(&'a str),
    /// A strong or emphasis delimiter.
    Delim(Delimiter),
}

impl<'a> Token<'a> {
    fn as_str(&self) -> &'a str {
        match self {
            Token::Text(text) => text,
            Token::Delim(delim) => delim.as_str(),
        }
    }
}

/// Tokenizer for asterisk delimiters.
///
/// Runs of asterisks are split greedily into `**` pairs, with a trailing
/// single `*` for odd lengths.
struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }

        let remaining = &self.input[self.pos..];

        if remaining.starts_with("**") {
            self.pos += 2;
            return Some(Token::Delim(Delimiter::Strong));
        }
        if remaining.starts_with('*') {
            self.pos += 1;
            return Some(Token::Delim(Delimiter::Emphasis));
        }

        let end = remaining.find('*').unwrap_or(remaining.len());
        self.pos += end;
        Some(Token::Text(&remaining[..end]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_styles() -> MarkupStyles {
        MarkupStyles::new(Style::new().bold(), Style::new().underlined()).force_styling(true)
    }

    mod tokenizer {
        use super::*;

        #[test]
        fn splits_delimiters() {
            let tokens: Vec<_> = Tokenizer::new("a **b** *c*").collect();
            assert_eq!(
                tokens,
                vec![
                    Token::Text("a "),
                    Token::Delim(Delimiter::Strong),
                    Token::Text("b"),
                    Token::Delim(Delimiter::Strong),
                    Token::Text(" "),
                    Token::Delim(Delimiter::Emphasis),
                    Token::Text("c"),
                    Token::Delim(Delimiter::Emphasis),
                ]
            );
        }

        #[test]
        fn odd_run_ends_with_single() {
            let tokens: Vec<_> = Tokenizer::new("***").collect();
            assert_eq!(
                tokens,
                vec![
                    Token::Delim(Delimiter::Strong),
                    Token::Delim(Delimiter::Emphasis)
                ]
            );
        }

        #[test]
        fn empty_input() {
            assert_eq!(Tokenizer::new("").count(), 0);
        }
    }

    mod parse {
        use super::*;

        #[test]
        fn plain_text_single_span() {
            assert_eq!(parse_spans("hello world"), vec![Span::plain("hello world")]);
        }

        #[test]
        fn strong_and_emphasis() {
            assert_eq!(
                parse_spans("This text has *emphasized* and **strong** markup."),
                vec![
                    Span::plain("This text has "),
                    Span::emphasis("emphasized"),
                    Span::plain(" and "),
                    Span::strong("strong"),
                    Span::plain(" markup."),
                ]
            );
        }

        #[test]
        fn unclosed_emphasis_is_literal() {
            assert_eq!(
                parse_spans("This comes **after** the *existing content."),
                vec![
                    Span::plain("This comes "),
                    Span::strong("after"),
                    Span::plain(" the *existing content."),
                ]
            );
        }

        #[test]
        fn unclosed_strong_is_literal() {
            assert_eq!(parse_spans("a **b c"), vec![Span::plain("a **b c")]);
        }

        #[test]
        fn whitespace_after_opening_is_literal() {
            assert_eq!(parse_spans("2 * 3 * 4"), vec![Span::plain("2 * 3 * 4")]);
        }

        #[test]
        fn whitespace_before_closing_skips_to_next() {
            assert_eq!(
                parse_spans("*a * b*"),
                vec![Span::emphasis("a * b")]
            );
        }

        #[test]
        fn no_nesting_first_match_wins() {
            assert_eq!(
                parse_spans("*a **b** c*"),
                vec![Span::emphasis("a **b** c")]
            );
        }

        #[test]
        fn single_inside_strong_is_literal() {
            assert_eq!(parse_spans("**a *b* c**"), vec![Span::strong("a *b* c")]);
        }

        #[test]
        fn empty_delimiters_are_literal() {
            assert_eq!(parse_spans("****"), vec![Span::plain("****")]);
        }

        #[test]
        fn span_across_words() {
            assert_eq!(
                parse_spans("which *may interrupt* the"),
                vec![
                    Span::plain("which "),
                    Span::emphasis("may interrupt"),
                    Span::plain(" the"),
                ]
            );
        }

        #[test]
        fn unicode_content() {
            assert_eq!(parse_spans("**日本**"), vec![Span::strong("日本")]);
        }
    }

    mod span_kind {
        use super::*;

        #[test]
        fn combining_styles() {
            assert_eq!(SpanKind::Plain.with_emphasis(), SpanKind::Emphasis);
            assert_eq!(SpanKind::Strong.with_emphasis(), SpanKind::StrongEmphasis);
            assert_eq!(SpanKind::Emphasis.with_strong(), SpanKind::StrongEmphasis);
            assert_eq!(SpanKind::Plain.with_strong(), SpanKind::Strong);
        }

        #[test]
        fn push_span_merges_same_kind() {
            let mut spans = Vec::new();
            push_span(&mut spans, SpanKind::Plain, "a");
            push_span(&mut spans, SpanKind::Plain, "b");
            push_span(&mut spans, SpanKind::Strong, "");
            push_span(&mut spans, SpanKind::Strong, "c");
            assert_eq!(spans, vec![Span::plain("ab"), Span::strong("c")]);
        }

        #[test]
        fn serializes_snake_case() {
            let json = serde_json::to_string(&Span::new(SpanKind::StrongEmphasis, "x")).unwrap();
            assert_eq!(json, r#"{"kind":"strong_emphasis","text":"x"}"#);
        }
    }

    mod transforms {
        use super::*;

        #[test]
        fn remove_strips_delimiters() {
            let parser = MarkupParser::new(test_styles(), MarkupTransform::Remove);
            assert_eq!(parser.process("**a** *b* c"), "a b c");
        }

        #[test]
        fn keep_round_trips_input() {
            let parser = MarkupParser::new(test_styles(), MarkupTransform::Keep);
            for input in ["**a** *b* c", "a *b", "2 * 3", "*x **y** z*"] {
                assert_eq!(parser.process(input), input);
            }
        }

        #[test]
        fn apply_wraps_spans() {
            let parser = MarkupParser::new(test_styles(), MarkupTransform::Apply);
            assert_eq!(
                parser.process("a **b** *c*"),
                "a \x1b[1mb\x1b[0m \x1b[4mc\x1b[0m"
            );
        }

        #[test]
        fn apply_plain_styles_emits_no_escapes() {
            let parser = MarkupParser::new(MarkupStyles::default(), MarkupTransform::Apply);
            assert_eq!(parser.process("a **b** *c*"), "a b c");
        }

        #[test]
        fn strong_emphasis_chains_styles() {
            let painted = test_styles().paint(SpanKind::StrongEmphasis, "x");
            assert!(painted.contains("\x1b[1m"));
            assert!(painted.contains("\x1b[4m"));
            assert_eq!(console::strip_ansi_codes(&painted), "x");
        }
    }
}
