//! Spreadsheet selections
//!
//! This module contains:
//! - [`CellReference`] and [`CellRange`] - a cell ("A1") and a block of cells ("A1:B10")
//! - [`ColumnReference`] and [`ColumnRange`] - whole columns ("B", "A:C")
//! - [`RowReference`] and [`RowRange`] - whole rows ("3", "2:5")
//! - [`LabelName`] - a name for any of the above
//! - [`Selection`] - the union of all of them

mod cell;
mod column_row;
mod label;

pub use cell::{CellRange, CellReference};
pub use column_row::{ColumnRange, ColumnReference, RowRange, RowReference};
pub use label::{LabelMappings, LabelName, LabelResolver, MAX_LABEL_LEN};

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Any spreadsheet selection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    Cell(CellReference),
    CellRange(CellRange),
    Column(ColumnReference),
    ColumnRange(ColumnRange),
    Row(RowReference),
    RowRange(RowRange),
    Label(LabelName),
}

impl Selection {
    /// Parse any selection, picking the most specific form that matches
    ///
    /// ```
    /// use duke_convert_core::Selection;
    ///
    /// assert!(matches!(Selection::parse("B2").unwrap(), Selection::Cell(_)));
    /// assert!(matches!(Selection::parse("B2:C3").unwrap(), Selection::CellRange(_)));
    /// assert!(matches!(Selection::parse("A:C").unwrap(), Selection::ColumnRange(_)));
    /// assert!(matches!(Selection::parse("3").unwrap(), Selection::Row(_)));
    /// assert!(matches!(Selection::parse("TaxRate").unwrap(), Selection::Label(_)));
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::Empty("selection"));
        }

        let head: String = text
            .split(':')
            .next()
            .unwrap_or_default()
            .chars()
            .filter(|c| *c != '$')
            .collect();
        let all_digits = !head.is_empty() && head.chars().all(|c| c.is_ascii_digit());
        let all_letters = !head.is_empty() && head.chars().all(|c| c.is_ascii_alphabetic());

        if text.contains(':') {
            return if all_digits {
                RowRange::parse(text).map(Selection::RowRange)
            } else if all_letters {
                ColumnRange::parse(text).map(Selection::ColumnRange)
            } else {
                CellRange::parse(text).map(Selection::CellRange)
            };
        }

        if all_digits {
            return RowReference::parse(text).map(Selection::Row);
        }
        if all_letters {
            if let Ok(column) = ColumnReference::parse(text) {
                return Ok(Selection::Column(column));
            }
        }
        match CellReference::parse(text) {
            Ok(cell) => Ok(Selection::Cell(cell)),
            Err(cell_error) => LabelName::parse(text)
                .map(Selection::Label)
                .map_err(|_| cell_error),
        }
    }

    /// Short name of the selection kind, for messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Selection::Cell(_) => "cell",
            Selection::CellRange(_) => "cell range",
            Selection::Column(_) => "column",
            Selection::ColumnRange(_) => "column range",
            Selection::Row(_) => "row",
            Selection::RowRange(_) => "row range",
            Selection::Label(_) => "label",
        }
    }

    /// Whether this selection covers exactly one cell, column or row
    pub fn is_single(&self) -> bool {
        match self {
            Selection::Cell(_) | Selection::Column(_) | Selection::Row(_) => true,
            Selection::CellRange(r) => r.cell_count() == 1,
            Selection::ColumnRange(r) => r.count() == 1,
            Selection::RowRange(r) => r.count() == 1,
            Selection::Label(_) => false,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Cell(s) => s.fmt(f),
            Selection::CellRange(s) => s.fmt(f),
            Selection::Column(s) => s.fmt(f),
            Selection::ColumnRange(s) => s.fmt(f),
            Selection::Row(s) => s.fmt(f),
            Selection::RowRange(s) => s.fmt(f),
            Selection::Label(s) => s.fmt(f),
        }
    }
}

impl FromStr for Selection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<CellReference> for Selection {
    fn from(cell: CellReference) -> Self {
        Selection::Cell(cell)
    }
}

impl From<CellRange> for Selection {
    fn from(range: CellRange) -> Self {
        Selection::CellRange(range)
    }
}

impl From<LabelName> for Selection {
    fn from(label: LabelName) -> Self {
        Selection::Label(label)
    }
}

/// Character cursor shared by the selection parsers; positions are char indices
pub(crate) struct Cursor<'a> {
    text: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub(crate) fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn column(&mut self) -> Result<ColumnReference> {
        if self.text.is_empty() {
            return Err(Error::Empty("column"));
        }
        let absolute = self.eat('$');
        let start = self.pos;
        let mut value: u64 = 0;
        while let Some(c) = self.peek().filter(char::is_ascii_alphabetic) {
            value = value
                .saturating_mul(26)
                .saturating_add((c.to_ascii_uppercase() as u8 - b'A') as u64 + 1);
            self.pos += 1;
        }
        if self.pos == start {
            return Err(Error::invalid_character(self.text, self.pos, "column"));
        }
        let index = value - 1;
        if index >= MAX_COLS as u64 {
            return Err(Error::ColumnOutOfBounds(index, MAX_COLS - 1));
        }
        Ok(ColumnReference {
            value: index as u16,
            absolute,
        })
    }

    pub(crate) fn row(&mut self) -> Result<RowReference> {
        if self.text.is_empty() {
            return Err(Error::Empty("row"));
        }
        let absolute = self.eat('$');
        let start = self.pos;
        let mut number: u64 = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            number = number.saturating_mul(10).saturating_add(d as u64);
            self.pos += 1;
        }
        if self.pos == start {
            return Err(Error::invalid_character(self.text, self.pos, "row"));
        }
        if number == 0 {
            return Err(Error::invalid_character(self.text, start, "row"));
        }
        if number > MAX_ROWS as u64 {
            return Err(Error::RowOutOfBounds(number - 1, MAX_ROWS - 1));
        }
        Ok(RowReference {
            value: (number - 1) as u32,
            absolute,
        })
    }

    pub(crate) fn cell(&mut self) -> Result<CellReference> {
        if self.text.is_empty() {
            return Err(Error::Empty("cell"));
        }
        let column = self.column()?;
        let row = self.row()?;
        Ok(CellReference { column, row })
    }

    pub(crate) fn finish(&self, what: &'static str) -> Result<()> {
        if self.pos < self.chars.len() {
            return Err(Error::invalid_character(self.text, self.pos, what));
        }
        Ok(())
    }
}
