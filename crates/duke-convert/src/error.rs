//! Conversion error types

use duke_convert_core::{SpreadsheetError, Value, ValueType};
use thiserror::Error;

/// Result of a single conversion
pub type ConvertResult = std::result::Result<Value, ConvertError>;

/// Why a conversion did not produce a value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// The value could not be converted; callers may try another converter
    #[error("{message}")]
    Failed { message: String },

    /// A spreadsheet error was met under the throwing policy; aborts the whole conversion
    #[error("Spreadsheet error {0}")]
    Thrown(SpreadsheetError),
}

impl ConvertError {
    /// Recoverable failure with a message
    pub fn failed<S: Into<String>>(message: S) -> Self {
        ConvertError::Failed {
            message: message.into(),
        }
    }

    /// Recoverable failure for a value/target pair no rule applies to
    pub fn unsupported(value: &Value, target: ValueType) -> Self {
        Self::failed(format!(
            "Failed to convert {} ({}) to {}",
            describe(value),
            value.type_label(),
            target
        ))
    }

    /// Whether a combinator may move on to its next alternative
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ConvertError::Failed { .. })
    }
}

impl From<duke_convert_core::Error> for ConvertError {
    fn from(e: duke_convert_core::Error) -> Self {
        ConvertError::failed(e.to_string())
    }
}

/// Render a value for a failure message; text is quoted so blanks stay visible
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("{s:?}"),
        Value::Char(c) => format!("{c:?}"),
        Value::Empty => "empty".to_string(),
        other => other.to_string(),
    }
}

/// Errors building a format or parse pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Pattern text was empty
    #[error("Empty pattern")]
    Empty,

    /// A character the pattern kind does not allow
    #[error("Invalid character {character:?} at {position} in {pattern:?}")]
    InvalidCharacter {
        character: char,
        position: usize,
        pattern: String,
    },

    /// A quoted literal or escape ran off the end of the pattern
    #[error("Unterminated literal in {0:?}")]
    Unterminated(String),

    /// More sections than the pattern kind allows
    #[error("Too many sections in {0:?}")]
    TooManySections(String),

    /// A pattern of the wrong kind for the category it was given to
    #[error("Expected a {expected} pattern, got {actual} pattern {pattern:?}")]
    WrongKind {
        expected: &'static str,
        actual: &'static str,
        pattern: String,
    },
}

/// Result type for pattern construction
pub type PatternResult<T> = std::result::Result<T, PatternError>;

/// A converter usage name that is not one of the known presets
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown converter usage: {0}")]
pub struct UnknownUsage(pub String);
