//! Cell reference and cell range types

use super::{ColumnReference, Cursor, RowReference};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A cell reference (e.g., "A1", "$B$2")
///
/// Cell references combine column letters (A-XFD) and row numbers (1-1048576).
/// The optional `$` prefix makes either half absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellReference {
    /// Column half
    pub column: ColumnReference,
    /// Row half
    pub row: RowReference,
}

impl CellReference {
    /// Create a relative cell reference from 0-based indices
    pub fn new(column: u16, row: u32) -> Result<Self> {
        Ok(Self {
            column: ColumnReference::new(column)?,
            row: RowReference::new(row)?,
        })
    }

    /// Parse a cell reference from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use duke_convert_core::CellReference;
    ///
    /// let cell = CellReference::parse("$B$2").unwrap();
    /// assert_eq!(cell.row.value, 1);
    /// assert_eq!(cell.column.value, 1);
    /// assert!(cell.row.absolute);
    /// assert!(cell.column.absolute);
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut cursor = Cursor::new(text);
        let cell = cursor.cell()?;
        cursor.finish("cell")?;
        Ok(cell)
    }

    /// Create a range from this cell to another
    pub fn to(&self, other: CellReference) -> CellRange {
        CellRange::new(*self, other)
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

impl FromStr for CellReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A range of cells (e.g., "A1:B10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Top-left cell
    pub begin: CellReference,
    /// Bottom-right cell
    pub end: CellReference,
}

impl CellRange {
    /// Create a new cell range
    pub fn new(begin: CellReference, end: CellReference) -> Self {
        // Normalize so begin is top-left and end is bottom-right
        let (top, bottom) = if begin.row.value <= end.row.value {
            (begin.row, end.row)
        } else {
            (end.row, begin.row)
        };

        let (left, right) = if begin.column.value <= end.column.value {
            (begin.column, end.column)
        } else {
            (end.column, begin.column)
        };

        Self {
            begin: CellReference {
                column: left,
                row: top,
            },
            end: CellReference {
                column: right,
                row: bottom,
            },
        }
    }

    /// Create a single-cell range
    pub fn single(cell: CellReference) -> Self {
        Self {
            begin: cell,
            end: cell,
        }
    }

    /// Parse a range from A1:B10 notation; a lone cell is a single-cell range
    pub fn parse(text: &str) -> Result<Self> {
        let mut cursor = Cursor::new(text);
        let begin = cursor.cell()?;
        let range = if cursor.eat(':') {
            Self::new(begin, cursor.cell()?)
        } else {
            Self::single(begin)
        };
        cursor.finish("cell range")?;
        Ok(range)
    }

    /// Check if a cell is within this range
    pub fn contains(&self, cell: &CellReference) -> bool {
        cell.row.value >= self.begin.row.value
            && cell.row.value <= self.end.row.value
            && cell.column.value >= self.begin.column.value
            && cell.column.value <= self.end.column.value
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end.row.value - self.begin.row.value + 1
    }

    /// Get the number of columns in the range
    pub fn column_count(&self) -> u32 {
        (self.end.column.value - self.begin.column.value) as u32 + 1
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.column_count() as u64
    }

    /// The cell, when this range holds exactly one
    pub fn to_cell(&self) -> Option<CellReference> {
        (self.cell_count() == 1).then_some(self.begin)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.begin == self.end {
            write!(f, "{}", self.begin)
        } else {
            write!(f, "{}:{}", self.begin, self.end)
        }
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parse() {
        let cell = CellReference::parse("A1").unwrap();
        assert_eq!(cell.row.value, 0);
        assert_eq!(cell.column.value, 0);
        assert!(!cell.row.absolute);
        assert!(!cell.column.absolute);

        let cell = CellReference::parse("$A1").unwrap();
        assert!(cell.column.absolute);
        assert!(!cell.row.absolute);

        let cell = CellReference::parse("XFD1048576").unwrap();
        assert_eq!(cell.row.value, 1048575);
        assert_eq!(cell.column.value, 16383);
    }

    #[test]
    fn test_cell_parse_errors() {
        assert!(matches!(CellReference::parse(""), Err(Error::Empty(_))));
        assert!(matches!(
            CellReference::parse("A"),
            Err(Error::Incomplete { .. })
        ));
        assert!(CellReference::parse("1").is_err());
        assert!(CellReference::parse("A0").is_err());
        assert!(CellReference::parse("A1048577").is_err());
        assert!(CellReference::parse("XFE1").is_err());

        assert_eq!(
            CellReference::parse("B2!").unwrap_err(),
            Error::InvalidCharacter {
                character: '!',
                position: 2,
                text: "B2!".into()
            }
        );
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellReference::new(0, 0).unwrap().to_string(), "A1");
        assert_eq!(CellReference::new(2, 99).unwrap().to_string(), "C100");
        assert_eq!(CellReference::parse("$z$99").unwrap().to_string(), "$Z$99");
    }

    #[test]
    fn test_cell_range_parse() {
        let range = CellRange::parse("C3:B2").unwrap();
        assert_eq!(range.begin, CellReference::parse("B2").unwrap());
        assert_eq!(range.end, CellReference::parse("C3").unwrap());
        assert_eq!(range.to_string(), "B2:C3");
        assert_eq!(range.cell_count(), 4);
        assert!(range.to_cell().is_none());

        let single = CellRange::parse("Z99").unwrap();
        assert_eq!(single.to_cell(), Some(CellReference::parse("Z99").unwrap()));
        assert_eq!(single.to_string(), "Z99");
    }

    #[test]
    fn test_cell_range_error_position() {
        let err = CellRange::parse("A1:B?").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidCharacter {
                character: '?',
                position: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_cell_range_contains() {
        let range = CellRange::parse("B2:D4").unwrap();

        assert!(range.contains(&CellReference::parse("B2").unwrap()));
        assert!(range.contains(&CellReference::parse("C3").unwrap()));
        assert!(!range.contains(&CellReference::parse("A1").unwrap()));
        assert!(!range.contains(&CellReference::parse("B5").unwrap()));
    }
}
