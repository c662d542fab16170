//! Spreadsheet error values (#DIV/0!, #NAME?, ...)

use crate::error::{Error, Result};
use crate::selection::Selection;
use std::fmt;

/// Spreadsheet error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpreadsheetErrorKind {
    /// #NULL! - Incorrect range operator
    Null,
    /// #DIV/0! - Division by zero
    Div0,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #REF! - Invalid cell reference
    Ref,
    /// #NAME? - Unrecognized name, or a cell/label that could not be found
    Name,
    /// #NAME? raised for an unknown name given as text
    NameString,
    /// #NUM! - Invalid numeric value
    Num,
    /// #N/A - Value not available
    Na,
    /// #SPILL! - Dynamic array cannot spill
    Spill,
    /// #CALC! - Calculation error
    Calc,
    /// #ERROR - internal failure that has no spreadsheet rendering
    Error,
}

impl SpreadsheetErrorKind {
    /// Every kind, in declaration order
    pub const ALL: [SpreadsheetErrorKind; 11] = [
        SpreadsheetErrorKind::Null,
        SpreadsheetErrorKind::Div0,
        SpreadsheetErrorKind::Value,
        SpreadsheetErrorKind::Ref,
        SpreadsheetErrorKind::Name,
        SpreadsheetErrorKind::NameString,
        SpreadsheetErrorKind::Num,
        SpreadsheetErrorKind::Na,
        SpreadsheetErrorKind::Spill,
        SpreadsheetErrorKind::Calc,
        SpreadsheetErrorKind::Error,
    ];

    /// Get the display token for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            SpreadsheetErrorKind::Null => "#NULL!",
            SpreadsheetErrorKind::Div0 => "#DIV/0!",
            SpreadsheetErrorKind::Value => "#VALUE!",
            SpreadsheetErrorKind::Ref => "#REF!",
            SpreadsheetErrorKind::Name | SpreadsheetErrorKind::NameString => "#NAME?",
            SpreadsheetErrorKind::Num => "#NUM!",
            SpreadsheetErrorKind::Na => "#N/A",
            SpreadsheetErrorKind::Spill => "#SPILL!",
            SpreadsheetErrorKind::Calc => "#CALC!",
            SpreadsheetErrorKind::Error => "#ERROR",
        }
    }

    /// Parse an error token (case-insensitive)
    pub fn parse(text: &str) -> Result<Self> {
        match text.to_uppercase().as_str() {
            "#NULL!" => Ok(SpreadsheetErrorKind::Null),
            "#DIV/0!" => Ok(SpreadsheetErrorKind::Div0),
            "#VALUE!" => Ok(SpreadsheetErrorKind::Value),
            "#REF!" => Ok(SpreadsheetErrorKind::Ref),
            "#NAME?" => Ok(SpreadsheetErrorKind::Name),
            "#NUM!" => Ok(SpreadsheetErrorKind::Num),
            "#N/A" => Ok(SpreadsheetErrorKind::Na),
            "#SPILL!" => Ok(SpreadsheetErrorKind::Spill),
            "#CALC!" => Ok(SpreadsheetErrorKind::Calc),
            "#ERROR" => Ok(SpreadsheetErrorKind::Error),
            _ => Err(Error::UnknownErrorKind(text.to_string())),
        }
    }

    /// Whether the kind has a user-facing rendering
    pub fn is_renderable(&self) -> bool {
        !matches!(self, SpreadsheetErrorKind::Error)
    }

    /// Create an error of this kind with a message
    pub fn with_message<S: Into<String>>(self, message: S) -> SpreadsheetError {
        SpreadsheetError {
            kind: self,
            message: message.into(),
            value: None,
        }
    }
}

impl fmt::Display for SpreadsheetErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error value: kind, message and an optional selection it concerns
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpreadsheetError {
    pub kind: SpreadsheetErrorKind,
    pub message: String,
    pub value: Option<Selection>,
}

impl SpreadsheetError {
    /// Error with an empty message
    pub fn new(kind: SpreadsheetErrorKind) -> Self {
        kind.with_message("")
    }

    /// A cell, range or label that could not be found
    pub fn selection_not_found(selection: Selection) -> Self {
        let message = match &selection {
            Selection::Label(label) => format!("Label not found: {label}"),
            other => format!("{} not found: {other}", capitalize(other.kind_name())),
        };
        Self {
            kind: SpreadsheetErrorKind::Name,
            message,
            value: Some(selection),
        }
    }

    /// Whether this error reports a selection that could not be found
    pub fn is_not_found(&self) -> bool {
        self.kind == SpreadsheetErrorKind::Name && self.value.is_some()
    }

    /// Whether this error reports a label that could not be found
    pub fn is_label_not_found(&self) -> bool {
        self.kind == SpreadsheetErrorKind::Name && matches!(self.value, Some(Selection::Label(_)))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for SpreadsheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} {}", self.kind, self.message)
        }
    }
}

impl From<SpreadsheetErrorKind> for SpreadsheetError {
    fn from(kind: SpreadsheetErrorKind) -> Self {
        SpreadsheetError::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tokens() {
        assert_eq!(SpreadsheetErrorKind::Div0.to_string(), "#DIV/0!");
        assert_eq!(SpreadsheetErrorKind::NameString.as_str(), "#NAME?");
        assert_eq!(SpreadsheetErrorKind::parse("#n/a").unwrap(), SpreadsheetErrorKind::Na);
        assert!(SpreadsheetErrorKind::parse("#WHAT").is_err());
        assert!(!SpreadsheetErrorKind::Error.is_renderable());
    }

    #[test]
    fn test_selection_not_found() {
        let error = SpreadsheetError::selection_not_found(Selection::parse("B2").unwrap());
        assert!(error.is_not_found());
        assert!(!error.is_label_not_found());
        assert_eq!(error.message, "Cell not found: B2");

        let label = SpreadsheetError::selection_not_found(Selection::parse("Sales").unwrap());
        assert!(label.is_label_not_found());
        assert_eq!(label.to_string(), "#NAME? Label not found: Sales");

        assert!(!SpreadsheetError::new(SpreadsheetErrorKind::Name).is_not_found());
    }
}
