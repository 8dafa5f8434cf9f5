//! Error types for tree construction, lookup, splicing and configuration.

use thiserror::Error;

/// Errors raised by item tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// An append used an identifier that already exists in the tree.
    #[error("the item ID '{0}' is already in use")]
    DuplicateIdentifier(String),

    /// A lookup used an identifier that does not exist in the tree.
    #[error("an item with the ID '{0}' does not exist")]
    UnknownIdentifier(String),

    /// Inline content was spliced into an item that has no text of its own.
    #[error("the item '{0}' has no text content to extend")]
    NoContent(String),

    /// A splice classifier keyword was not recognized.
    #[error("unrecognized classifier '{0}'")]
    UnknownClassifier(String),
}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Failures collected while applying a batch of splices.
///
/// Every valid entry of the batch has already been applied when this error
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} splice(s) failed: {}", .errors.len(), join_errors(.errors))]
pub struct SpliceError {
    pub errors: Vec<TreeError>,
}

fn join_errors(errors: &[TreeError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while loading a formatter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// YAML parse error.
    #[error("failed to parse formatter configuration: {0}")]
    Parse(String),

    /// Invalid color value in a style definition.
    #[error("invalid color '{value}' for style '{style}': {message}")]
    InvalidColor {
        style: String,
        value: String,
        message: String,
    },

    /// Unknown attribute in a style shorthand.
    #[error("unknown attribute '{attribute}' in style '{style}'")]
    UnknownAttribute { style: String, attribute: String },
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_identifier() {
        let err = TreeError::DuplicateIdentifier("options".to_string());
        assert!(err.to_string().contains("options"));
        assert!(err.to_string().contains("already in use"));

        let err = TreeError::UnknownIdentifier("missing".to_string());
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_splice_error_lists_all_failures() {
        let err = SpliceError {
            errors: vec![
                TreeError::UnknownIdentifier("a".to_string()),
                TreeError::UnknownIdentifier("b".to_string()),
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 splice(s) failed"));
        assert!(msg.contains("'a'"));
        assert!(msg.contains("'b'"));
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<u32>("[").unwrap_err();
        let err: ConfigError = yaml_err.into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
