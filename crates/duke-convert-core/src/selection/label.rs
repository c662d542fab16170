//! Label names and label mappings
//!
//! A label is a user-assigned name for a cell or range, making formulas easier to read.
//!
//! ```text
//! TaxRate -> $B$1
//! =Price * TaxRate
//! ```

use super::{CellReference, Selection};
use crate::error::{Error, Result};
use ahash::AHashMap;
use std::fmt;
use std::str::FromStr;

/// Maximum length of a label name
pub const MAX_LABEL_LEN: usize = 255;

/// A label name (e.g. "TaxRate")
///
/// Labels start with a letter, `_` or `\`, continue with letters, digits, `_` or `.`,
/// and may not look like a cell reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelName(String);

impl LabelName {
    /// Parse and validate a label name
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::Empty("label"));
        }
        if text.chars().count() > MAX_LABEL_LEN {
            return Err(Error::InvalidLabel(format!(
                "{text:?} longer than {MAX_LABEL_LEN} characters"
            )));
        }

        for (position, c) in text.chars().enumerate() {
            let valid = if position == 0 {
                c.is_alphabetic() || c == '_' || c == '\\'
            } else {
                c.is_alphanumeric() || c == '_' || c == '.'
            };
            if !valid {
                return Err(Error::invalid_character(text, position, "label"));
            }
        }

        if CellReference::parse(text).is_ok() {
            return Err(Error::InvalidLabel(format!(
                "{text:?} is a cell reference"
            )));
        }

        Ok(Self(text.to_string()))
    }

    /// Get the label text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LabelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LabelName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Resolves labels to the selection they name
pub trait LabelResolver {
    /// The selection a label refers to, or `None` when the label is unknown
    fn resolve_label(&self, label: &LabelName) -> Option<Selection>;
}

/// Collection of label mappings with case-insensitive lookup
#[derive(Debug, Default, Clone)]
pub struct LabelMappings {
    /// Keyed by lowercase label text
    mappings: AHashMap<String, (LabelName, Selection)>,
}

impl LabelMappings {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self::default()
    }

    fn key(label: &LabelName) -> String {
        label.as_str().to_lowercase()
    }

    /// Define a new label
    ///
    /// Returns an error if a label with the same name (ignoring case) already exists
    pub fn define(&mut self, label: LabelName, target: Selection) -> Result<()> {
        let key = Self::key(&label);
        if self.mappings.contains_key(&key) {
            return Err(Error::DuplicateLabel(label.to_string()));
        }
        self.mappings.insert(key, (label, target));
        Ok(())
    }

    /// Define or replace a label
    pub fn define_or_update(&mut self, label: LabelName, target: Selection) {
        self.mappings.insert(Self::key(&label), (label, target));
    }

    /// Remove a label, returning what it pointed at
    pub fn remove(&mut self, label: &LabelName) -> Option<Selection> {
        self.mappings.remove(&Self::key(label)).map(|(_, s)| s)
    }

    /// Get the number of labels
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl LabelResolver for LabelMappings {
    fn resolve_label(&self, label: &LabelName) -> Option<Selection> {
        self.mappings.get(&Self::key(label)).map(|(_, s)| s.clone())
    }
}
