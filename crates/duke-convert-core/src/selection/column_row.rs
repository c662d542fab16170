//! Column and row references and their ranges

use super::Cursor;
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A column reference (e.g. "B", "$XFD")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnReference {
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub value: u16,
    /// Whether the reference is absolute ($)
    pub absolute: bool,
}

impl ColumnReference {
    /// Create a relative column reference
    pub fn new(value: u16) -> Result<Self> {
        if value >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(value as u64, MAX_COLS - 1));
        }
        Ok(Self {
            value,
            absolute: false,
        })
    }

    /// Copy of this reference with the absolute flag set
    pub fn set_absolute(self, absolute: bool) -> Self {
        Self { absolute, ..self }
    }

    /// Parse a column from letters, with an optional `$` prefix
    ///
    /// ```
    /// use duke_convert_core::ColumnReference;
    ///
    /// let column = ColumnReference::parse("$AA").unwrap();
    /// assert_eq!(column.value, 26);
    /// assert!(column.absolute);
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut cursor = Cursor::new(text);
        let column = cursor.column()?;
        cursor.finish("column")?;
        Ok(column)
    }

    /// Column for a single letter shorthand ('a'..'z', 'A'..'Z')
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            Some(Self {
                value: (c.to_ascii_uppercase() as u8 - b'A') as u16,
                absolute: false,
            })
        } else {
            None
        }
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn to_letters(value: u16) -> String {
        let mut result = String::new();
        let mut n = value as u32 + 1;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_value(letters: &str) -> Result<u16> {
        Self::parse(letters).map(|c| c.value)
    }
}

impl fmt::Display for ColumnReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            f.write_str("$")?;
        }
        f.write_str(&Self::to_letters(self.value))
    }
}

impl FromStr for ColumnReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A row reference (e.g. "12", "$3")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowReference {
    /// Row index (0-based internally, 1-based in display)
    pub value: u32,
    /// Whether the reference is absolute ($)
    pub absolute: bool,
}

impl RowReference {
    /// Create a relative row reference from a 0-based index
    pub fn new(value: u32) -> Result<Self> {
        if value >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(value as u64, MAX_ROWS - 1));
        }
        Ok(Self {
            value,
            absolute: false,
        })
    }

    /// Copy of this reference with the absolute flag set
    pub fn set_absolute(self, absolute: bool) -> Self {
        Self { absolute, ..self }
    }

    /// Parse a 1-based row number with an optional `$` prefix
    pub fn parse(text: &str) -> Result<Self> {
        let mut cursor = Cursor::new(text);
        let row = cursor.row()?;
        cursor.finish("row")?;
        Ok(row)
    }

    /// Row for a single digit shorthand ('1'..'9')
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_digit(10) {
            Some(d) if d > 0 => Some(Self {
                value: d - 1,
                absolute: false,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for RowReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            f.write_str("$")?;
        }
        write!(f, "{}", self.value + 1)
    }
}

impl FromStr for RowReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A range of whole columns (e.g. "A:C")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRange {
    /// Left-most column
    pub begin: ColumnReference,
    /// Right-most column
    pub end: ColumnReference,
}

impl ColumnRange {
    /// Create a range; the ends are swapped if given out of order
    pub fn new(begin: ColumnReference, end: ColumnReference) -> Self {
        if begin.value <= end.value {
            Self { begin, end }
        } else {
            Self {
                begin: end,
                end: begin,
            }
        }
    }

    /// Range holding exactly one column
    pub fn single(column: ColumnReference) -> Self {
        Self {
            begin: column,
            end: column,
        }
    }

    /// Parse "A:C", or "A" for a single column range
    pub fn parse(text: &str) -> Result<Self> {
        let mut cursor = Cursor::new(text);
        let begin = cursor.column()?;
        let range = if cursor.eat(':') {
            Self::new(begin, cursor.column()?)
        } else {
            Self::single(begin)
        };
        cursor.finish("column range")?;
        Ok(range)
    }

    /// Number of columns in the range
    pub fn count(&self) -> u32 {
        (self.end.value - self.begin.value) as u32 + 1
    }

    /// The column, when this range holds exactly one
    pub fn to_column(&self) -> Option<ColumnReference> {
        (self.count() == 1).then_some(self.begin)
    }
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.begin == self.end {
            write!(f, "{}", self.begin)
        } else {
            write!(f, "{}:{}", self.begin, self.end)
        }
    }
}

/// A range of whole rows (e.g. "2:5")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRange {
    /// Top row
    pub begin: RowReference,
    /// Bottom row
    pub end: RowReference,
}

impl RowRange {
    /// Create a range; the ends are swapped if given out of order
    pub fn new(begin: RowReference, end: RowReference) -> Self {
        if begin.value <= end.value {
            Self { begin, end }
        } else {
            Self {
                begin: end,
                end: begin,
            }
        }
    }

    /// Range holding exactly one row
    pub fn single(row: RowReference) -> Self {
        Self {
            begin: row,
            end: row,
        }
    }

    /// Parse "2:5", or "2" for a single row range
    pub fn parse(text: &str) -> Result<Self> {
        let mut cursor = Cursor::new(text);
        let begin = cursor.row()?;
        let range = if cursor.eat(':') {
            Self::new(begin, cursor.row()?)
        } else {
            Self::single(begin)
        };
        cursor.finish("row range")?;
        Ok(range)
    }

    /// Number of rows in the range
    pub fn count(&self) -> u32 {
        self.end.value - self.begin.value + 1
    }

    /// The row, when this range holds exactly one
    pub fn to_row(&self) -> Option<RowReference> {
        (self.count() == 1).then_some(self.begin)
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.begin == self.end {
            write!(f, "{}", self.begin)
        } else {
            write!(f, "{}:{}", self.begin, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(ColumnReference::to_letters(0), "A");
        assert_eq!(ColumnReference::to_letters(25), "Z");
        assert_eq!(ColumnReference::to_letters(26), "AA");
        assert_eq!(ColumnReference::to_letters(701), "ZZ");
        assert_eq!(ColumnReference::to_letters(702), "AAA");
        assert_eq!(ColumnReference::to_letters(16383), "XFD");

        assert_eq!(ColumnReference::letters_to_value("A").unwrap(), 0);
        assert_eq!(ColumnReference::letters_to_value("aa").unwrap(), 26);
        assert_eq!(ColumnReference::letters_to_value("XFD").unwrap(), 16383);
        assert!(ColumnReference::letters_to_value("XFE").is_err());
    }

    #[test]
    fn test_column_parse_invalid_character() {
        let err = ColumnReference::parse("AB1").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidCharacter {
                character: '1',
                position: 2,
                text: "AB1".into()
            }
        );
    }

    #[test]
    fn test_row_parse() {
        let row = RowReference::parse("$12").unwrap();
        assert_eq!(row.value, 11);
        assert!(row.absolute);
        assert_eq!(row.to_string(), "$12");

        assert!(RowReference::parse("0").is_err());
        assert!(RowReference::parse("1048577").is_err());
        assert!(RowReference::parse("").is_err());
    }

    #[test]
    fn test_char_shorthand() {
        assert_eq!(ColumnReference::from_char('c').unwrap().value, 2);
        assert_eq!(RowReference::from_char('9').unwrap().value, 8);
        assert!(RowReference::from_char('0').is_none());
        assert!(ColumnReference::from_char('1').is_none());
    }

    #[test]
    fn test_column_range() {
        let range = ColumnRange::parse("C:A").unwrap();
        assert_eq!(range.to_string(), "A:C");
        assert_eq!(range.count(), 3);
        assert!(range.to_column().is_none());

        let single = ColumnRange::parse("B").unwrap();
        assert_eq!(single.to_column(), Some(ColumnReference::parse("B").unwrap()));
    }

    #[test]
    fn test_row_range() {
        let range = RowRange::parse("5:2").unwrap();
        assert_eq!(range.to_string(), "2:5");
        assert_eq!(range.count(), 4);

        let err = RowRange::parse("2:x").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidCharacter {
                character: 'x',
                position: 2,
                ..
            }
        ));
    }
}
