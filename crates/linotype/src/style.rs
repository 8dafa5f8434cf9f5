//! Style definitions for strong and emphasized text.
//!
//! Styles can be given programmatically as [`console::Style`] values or
//! loaded from configuration, where each style is either a shorthand string
//! or a mapping of attributes:
//!
//! ```yaml
//! strong: bold
//! emphasis:
//!   fg: "#ade0e0"
//!   underline: true
//! ```
//!
//! Colors are one of the eight ANSI names (optionally prefixed with
//! `bright_`), a palette index up to 255, or a `#rgb` / `#rrggbb` hex code.

use console::{Color, Style};
use serde::Deserialize;

use crate::error::ConfigError;

/// The eight ANSI colors, in palette order.
const ANSI_COLORS: [(&str, Color); 8] = [
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("white", Color::White),
];

/// A color as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorDef {
    Named(Color),
    /// Index into the 256-color palette.
    Color256(u8),
    /// True color, mapped to the nearest palette entry on output.
    Rgb(u8, u8, u8),
}

impl ColorDef {
    /// Reads a color from a YAML scalar. Numbers are palette indices.
    pub fn parse_value(value: &serde_yaml::Value) -> Result<Self, String> {
        match value {
            serde_yaml::Value::String(s) => Self::parse_string(s),
            serde_yaml::Value::Number(n) => match n.as_u64() {
                Some(index) => Self::palette(index),
                None => Err(format!("{} is not a palette index", n)),
            },
            other => Err(format!("expected a color name, hex code or index, got {:?}", other)),
        }
    }

    /// Reads a color name, `bright_` name, palette index or hex code.
    pub fn parse_string(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if let Some(digits) = s.strip_prefix('#') {
            Self::hex(digits)
        } else if let Ok(index) = s.parse::<u64>() {
            Self::palette(index)
        } else {
            Self::named(&s.to_lowercase())
        }
    }

    fn palette(index: u64) -> Result<Self, String> {
        u8::try_from(index)
            .map(ColorDef::Color256)
            .map_err(|_| format!("palette index {} is above 255", index))
    }

    fn hex(digits: &str) -> Result<Self, String> {
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("'#{}' is not a hex color", digits));
        }
        let channel = |range: std::ops::Range<usize>, scale: u8| {
            u8::from_str_radix(&digits[range], 16)
                .map(|value| value * scale)
                .map_err(|_| format!("'#{}' is not a hex color", digits))
        };
        match digits.len() {
            3 => Ok(ColorDef::Rgb(channel(0..1, 17)?, channel(1..2, 17)?, channel(2..3, 17)?)),
            6 => Ok(ColorDef::Rgb(channel(0..2, 1)?, channel(2..4, 1)?, channel(4..6, 1)?)),
            _ => Err(format!("'#{}' needs 3 or 6 hex digits", digits)),
        }
    }

    fn named(name: &str) -> Result<Self, String> {
        let (base, bright) = match name.strip_prefix("bright_") {
            Some(base) => (base, true),
            None => (name, false),
        };
        let base = if base == "gray" || base == "grey" { "white" } else { base };
        let position = ANSI_COLORS
            .iter()
            .position(|(known, _)| *known == base)
            .ok_or_else(|| format!("'{}' is not a color name", name))?;

        // console maps the bright variants to palette entries 8-15
        Ok(if bright {
            ColorDef::Color256(position as u8 + 8)
        } else {
            ColorDef::Named(ANSI_COLORS[position].1)
        })
    }

    pub fn to_console_color(&self) -> Color {
        match *self {
            ColorDef::Named(color) => color,
            ColorDef::Color256(index) => Color::Color256(index),
            ColorDef::Rgb(r, g, b) => Color::Color256(rgb_to_ansi256(r, g, b)),
        }
    }
}

/// The closest entry of the 256-color palette: the grayscale ramp for
/// grays, the 6x6x6 cube otherwise.
pub fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        return match r {
            0..=7 => 16,
            249..=255 => 231,
            _ => 232 + ((u16::from(r) - 8) * 24 / 247) as u8,
        };
    }
    let level = |c: u8| (u16::from(c) * 5 / 255) as u8;
    16 + 36 * level(r) + 6 * level(g) + level(b)
}

/// A style as written in configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StyleConfig {
    /// Space-separated attributes and a foreground color, e.g. `"bold red"`.
    Shorthand(String),
    /// Explicit attributes.
    Attributes(StyleAttributes),
}

/// Explicit style attributes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleAttributes {
    pub fg: Option<serde_yaml::Value>,
    pub bg: Option<serde_yaml::Value>,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
}

impl StyleConfig {
    /// Builds a `console::Style`. `name` is used in error messages.
    pub fn to_style(&self, name: &str) -> Result<Style, ConfigError> {
        match self {
            StyleConfig::Shorthand(spec) => parse_shorthand(name, spec),
            StyleConfig::Attributes(attrs) => attrs.to_style(name),
        }
    }
}

impl StyleAttributes {
    pub fn to_style(&self, name: &str) -> Result<Style, ConfigError> {
        let color = |value: &serde_yaml::Value| {
            ColorDef::parse_value(value).map_err(|message| ConfigError::InvalidColor {
                style: name.to_string(),
                value: yaml_scalar(value),
                message,
            })
        };

        let mut style = Style::new();
        if let Some(fg) = &self.fg {
            style = style.fg(color(fg)?.to_console_color());
        }
        if let Some(bg) = &self.bg {
            style = style.bg(color(bg)?.to_console_color());
        }
        if self.bold {
            style = style.bold();
        }
        if self.dim {
            style = style.dim();
        }
        if self.italic {
            style = style.italic();
        }
        if self.underline {
            style = style.underlined();
        }
        Ok(style)
    }
}

/// Parses a shorthand such as `"bold underline red"`.
///
/// Attribute keywords may appear in any order; any other word must be a
/// color and sets the foreground.
pub fn parse_shorthand(name: &str, spec: &str) -> Result<Style, ConfigError> {
    let mut style = Style::new();
    for word in spec.split_whitespace() {
        style = match word.to_lowercase().as_str() {
            "bold" => style.bold(),
            "dim" => style.dim(),
            "italic" => style.italic(),
            "underline" | "underlined" => style.underlined(),
            "none" | "plain" => style,
            other => match ColorDef::parse_string(other) {
                Ok(color) => style.fg(color.to_console_color()),
                Err(_) => {
                    return Err(ConfigError::UnknownAttribute {
                        style: name.to_string(),
                        attribute: word.to_string(),
                    })
                }
            },
        };
    }
    Ok(style)
}

fn yaml_scalar(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => format!("{:?}", other),
    }
}
