//! Error types for duke-convert-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or building core values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Text was empty where a value was expected
    #[error("Empty {0}")]
    Empty(&'static str),

    /// A character that is not allowed at this position
    #[error("Invalid character {character:?} at {position} in {text:?}")]
    InvalidCharacter {
        character: char,
        position: usize,
        text: String,
    },

    /// Text ended before a complete value was read
    #[error("Incomplete {what} in {text:?}")]
    Incomplete { what: &'static str, text: String },

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u64, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u64, u16),

    /// Invalid label name
    #[error("Invalid label name: {0}")]
    InvalidLabel(String),

    /// Unknown type name
    #[error("Unknown value type: {0}")]
    UnknownType(String),

    /// Unknown spreadsheet error token
    #[error("Unknown spreadsheet error: {0}")]
    UnknownErrorKind(String),

    /// Label already defined
    #[error("Label already exists: {0}")]
    DuplicateLabel(String),

    /// JSON value did not match the declared type
    #[error("Invalid JSON for {expected}: {actual}")]
    InvalidJson {
        expected: &'static str,
        actual: String,
    },
}

impl Error {
    /// Build an [`Error::InvalidCharacter`] for the character at `position` (a char index).
    ///
    /// Falls back to [`Error::Incomplete`] when `position` is past the end of `text`.
    pub fn invalid_character(text: &str, position: usize, what: &'static str) -> Self {
        match text.chars().nth(position) {
            Some(character) => Error::InvalidCharacter {
                character,
                position,
                text: text.to_string(),
            },
            None => Error::Incomplete {
                what,
                text: text.to_string(),
            },
        }
    }
}
