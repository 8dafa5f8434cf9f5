//! Rendering configuration.
//!
//! A [`Formatter`] is attached to a [`HelpTree`](crate::HelpTree) and may be
//! overridden on any item. Items without an override inherit the formatter
//! of their nearest ancestor.
//!
//! Formatters are built with consuming setters:
//!
//! ```rust
//! use linotype::{DefinitionStyle, Formatter};
//!
//! let formatter = Formatter::new()
//!     .max_width(72)
//!     .indent_width(2)
//!     .definition_style(DefinitionStyle::Heading);
//! assert_eq!(formatter.max_width, 72);
//! ```
//!
//! or loaded from YAML with [`Formatter::from_yaml`].

use console::Style;
use linotype_markup::MarkupStyles;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::style::StyleConfig;

/// How a definition lays out its term, argument string and description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionStyle {
    /// Description on the same line, aligned with every sibling that uses
    /// this style.
    #[default]
    Aligned,
    /// Description on the lines below the signature, one indent level in.
    Heading,
    /// Description on the same line right after the item's own signature.
    Inline,
    /// Description on the next line, starting at the aligned column.
    Overflow,
}

/// Whether rendered text carries ANSI escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Always emit escape sequences for styled spans.
    #[default]
    Term,
    /// Never emit escape sequences.
    Text,
    /// Emit escape sequences when the terminal supports them.
    Auto,
}

impl OutputMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            OutputMode::Term => true,
            OutputMode::Text => false,
            OutputMode::Auto => console::colors_enabled(),
        }
    }
}

/// Options controlling how items are rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Formatter {
    /// Maximum line width in columns.
    pub max_width: usize,
    /// Shrink to the terminal width when it is narrower than `max_width`.
    pub auto_width: bool,
    /// Columns added per nesting level.
    pub indent_width: usize,
    /// Columns between a signature and a description on the same line.
    pub definition_gap: usize,
    pub definition_style: DefinitionStyle,
    /// Emphasize definition terms, argument names and their mentions.
    pub auto_markup: bool,
    /// Parse `**strong**` and `*emphasized*` delimiters.
    pub manual_markup: bool,
    pub visible: bool,
    pub strong: Style,
    pub emphasis: Style,
    pub output: OutputMode,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            max_width: 79,
            auto_width: false,
            indent_width: 4,
            definition_gap: 2,
            definition_style: DefinitionStyle::default(),
            auto_markup: true,
            manual_markup: true,
            visible: true,
            strong: Style::new(),
            emphasis: Style::new(),
            output: OutputMode::default(),
        }
    }
}

impl Formatter {
    /// Creates a formatter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bold strong text and underlined emphasis.
    pub fn ansi() -> Self {
        Self::new()
            .strong(Style::new().bold())
            .emphasis(Style::new().underlined())
    }

    pub fn max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn auto_width(mut self, auto_width: bool) -> Self {
        self.auto_width = auto_width;
        self
    }

    pub fn indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    pub fn definition_gap(mut self, definition_gap: usize) -> Self {
        self.definition_gap = definition_gap;
        self
    }

    pub fn definition_style(mut self, style: DefinitionStyle) -> Self {
        self.definition_style = style;
        self
    }

    pub fn auto_markup(mut self, auto_markup: bool) -> Self {
        self.auto_markup = auto_markup;
        self
    }

    pub fn manual_markup(mut self, manual_markup: bool) -> Self {
        self.manual_markup = manual_markup;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn strong(mut self, style: Style) -> Self {
        self.strong = style;
        self
    }

    pub fn emphasis(mut self, style: Style) -> Self {
        self.emphasis = style;
        self
    }

    pub fn output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// The width to wrap at.
    ///
    /// With `auto_width`, this is the terminal width capped at `max_width`.
    /// Falls back to `max_width` when no terminal is attached.
    pub fn effective_width(&self) -> usize {
        if !self.auto_width {
            return self.max_width;
        }
        match get_terminal_width() {
            Some(columns) => {
                tracing::trace!(columns, max_width = self.max_width, "resolved terminal width");
                columns.min(self.max_width)
            }
            None => self.max_width,
        }
    }

    /// The styles to paint strong and emphasized spans with, forced on or
    /// off according to the output mode.
    pub fn markup_styles(&self) -> MarkupStyles {
        MarkupStyles::new(self.strong.clone(), self.emphasis.clone())
            .force_styling(self.output.should_use_color())
    }

    /// Loads a formatter from YAML. Missing keys keep their defaults.
    ///
    /// ```rust
    /// use linotype::{DefinitionStyle, Formatter};
    ///
    /// let formatter = Formatter::from_yaml(
    ///     "max_width: 60\ndefinition_style: heading\nstrong: bold red\n",
    /// )
    /// .unwrap();
    /// assert_eq!(formatter.max_width, 60);
    /// assert_eq!(formatter.definition_style, DefinitionStyle::Heading);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: FormatterConfig = serde_yaml::from_str(yaml)?;
        config.into_formatter()
    }
}

/// Gets the current terminal width, or None if not available.
fn get_terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(w, _)| w.0 as usize)
}

/// The YAML form of a [`Formatter`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FormatterConfig {
    max_width: Option<usize>,
    auto_width: Option<bool>,
    indent_width: Option<usize>,
    definition_gap: Option<usize>,
    definition_style: Option<DefinitionStyle>,
    auto_markup: Option<bool>,
    manual_markup: Option<bool>,
    visible: Option<bool>,
    strong: Option<StyleConfig>,
    emphasis: Option<StyleConfig>,
    output: Option<OutputMode>,
}

impl FormatterConfig {
    fn into_formatter(self) -> Result<Formatter, ConfigError> {
        let defaults = Formatter::default();
        Ok(Formatter {
            max_width: self.max_width.unwrap_or(defaults.max_width),
            auto_width: self.auto_width.unwrap_or(defaults.auto_width),
            indent_width: self.indent_width.unwrap_or(defaults.indent_width),
            definition_gap: self.definition_gap.unwrap_or(defaults.definition_gap),
            definition_style: self.definition_style.unwrap_or(defaults.definition_style),
            auto_markup: self.auto_markup.unwrap_or(defaults.auto_markup),
            manual_markup: self.manual_markup.unwrap_or(defaults.manual_markup),
            visible: self.visible.unwrap_or(defaults.visible),
            strong: match self.strong {
                Some(config) => config.to_style("strong")?,
                None => defaults.strong,
            },
            emphasis: match self.emphasis {
                Some(config) => config.to_style("emphasis")?,
                None => defaults.emphasis,
            },
            output: self.output.unwrap_or(defaults.output),
        })
    }
}
