//! # Linotype - Structured Help Messages
//!
//! `linotype` builds command-line help messages as a tree of items and
//! renders them either as wrapped, indented terminal text or as structured
//! fragments for a documentation generator.
//!
//! ## Core Concepts
//!
//! - [`HelpTree`]: arena of items, rooted in a synthetic container
//! - [`Text`] and [`Definition`]: the two kinds of content item
//! - [`Formatter`]: rendering options, inherited down the tree
//! - [`DefinitionStyle`]: how a term, its arguments and its description
//!   are laid out
//! - [`Splice`]: text inserted into or substituted for an item's content
//! - [`Fragment`]: exported item with `(kind, text)` spans
//!
//! ## Quick Start
//!
//! ```rust
//! use linotype::{Definition, Formatter, HelpTree, Text};
//!
//! let mut tree = HelpTree::new(Formatter::new().max_width(60));
//! let mut root = tree.root_mut();
//! root.add_text("Usage: grep [OPTIONS] PATTERN [FILE...]").unwrap();
//! root.add_text(Text::blank()).unwrap();
//! let mut options = root.add_text(Text::new("Options:").id("options")).unwrap();
//! options
//!     .add_definition(Definition::new("-q, --quiet", "", "Suppress all output."))
//!     .unwrap();
//! options
//!     .add_definition(Definition::new("-e", "PATTERN", "Use PATTERN for matching."))
//!     .unwrap();
//!
//! assert_eq!(
//!     tree.render(),
//!     "Usage: grep [OPTIONS] PATTERN [FILE...]\n\
//!      \n\
//!      Options:\n    \
//!          -q, --quiet  Suppress all output.\n    \
//!          -e PATTERN   Use PATTERN for matching."
//! );
//! ```
//!
//! ## Markup
//!
//! Item text may contain `**strong**` and `*emphasized*` spans. With
//! automatic markup, definition terms are strong and argument names are
//! emphasized wherever they appear in the description. Styles come from
//! the formatter:
//!
//! ```rust
//! use linotype::{Formatter, HelpTree, OutputMode};
//!
//! let mut tree = HelpTree::new(Formatter::ansi().output(OutputMode::Text));
//! tree.root_mut().add_text("Plain **text** output.").unwrap();
//! assert_eq!(tree.render(), "Plain text output.");
//! ```
//!
//! ## Documentation Export
//!
//! [`HelpTree::select`] copies a subtree by identifier, [`HelpTree::splice`]
//! applies externally supplied text to identified items, and
//! [`HelpTree::export`] produces [`Fragment`]s for a documentation
//! generator to turn into its own markup.

mod error;
mod export;
mod formatter;
mod markup;
mod render;
mod select;
pub mod style;
mod tree;
mod wrap;

pub use error::{ConfigError, Result, SpliceError, TreeError};
pub use export::{Block, ExportOptions, Fragment};
pub use formatter::{DefinitionStyle, Formatter, OutputMode};
pub use markup::{apply_markup, definition_spans, text_spans, DefinitionSpans};
pub use render::RenderOptions;
pub use select::{MarkupMode, Position, Splice};
pub use tree::{
    Definition, DefinitionContent, HelpTree, ItemId, ItemKind, ItemMut, ItemRef, Iter, RawContent,
    Text,
};
pub use wrap::{break_lines, display_width, pad_right, wrap};

// Re-export the span types used by exported fragments
pub use linotype_markup::{MarkupStyles, Span, SpanKind};
