//! Runtime values and their type tags

use crate::error::{Error, Result};
use crate::number::ExpressionNumber;
use crate::selection::{
    CellRange, CellReference, ColumnRange, ColumnReference, LabelName, RowRange, RowReference,
    Selection,
};
use crate::spreadsheet_error::SpreadsheetError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A value flowing through formulas, formatting, sorting or validation
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value (a missing cell, an omitted argument)
    #[default]
    Empty,
    Boolean(bool),
    Char(char),
    Byte(i8),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    BigInteger(i128),
    BigDecimal(Decimal),
    /// Formula number, in the spreadsheet's chosen representation
    Number(ExpressionNumber),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Selection(Selection),
    Error(SpreadsheetError),
}

impl Value {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Value::Text(s.into())
    }

    /// Check if the value is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Check if the value is a spreadsheet error
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Get the error if this is one
    pub fn as_error(&self) -> Option<&SpreadsheetError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Runtime type of this value; `None` for [`Value::Empty`]
    pub fn value_type(&self) -> Option<ValueType> {
        Some(match self {
            Value::Empty => return None,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Char(_) => ValueType::Char,
            Value::Byte(_) => ValueType::Byte,
            Value::Short(_) => ValueType::Short,
            Value::Integer(_) => ValueType::Integer,
            Value::Long(_) => ValueType::Long,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::BigInteger(_) => ValueType::BigInteger,
            Value::BigDecimal(_) => ValueType::BigDecimal,
            Value::Number(_) => ValueType::Number,
            Value::Text(_) => ValueType::Text,
            Value::Date(_) => ValueType::Date,
            Value::DateTime(_) => ValueType::DateTime,
            Value::Time(_) => ValueType::Time,
            Value::Selection(s) => ValueType::of_selection(s),
            Value::Error(_) => ValueType::Error,
        })
    }

    /// Whether this value can be used as-is where `target` is requested
    pub fn is_assignable_to(&self, target: ValueType) -> bool {
        self.value_type()
            .is_some_and(|t| target.is_assignable_from(t))
    }

    /// Get the type name for messages
    pub fn type_label(&self) -> &'static str {
        self.value_type().map(|t| t.label()).unwrap_or("Empty")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Value::Char(c) => write!(f, "{c}"),
            Value::Byte(n) => write!(f, "{n}"),
            Value::Short(n) => write!(f, "{n}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Double(n) => write!(f, "{n}"),
            Value::BigInteger(n) => write!(f, "{n}"),
            Value::BigDecimal(d) => write!(f, "{}", d.normalize()),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(d) => write!(f, "{}", d.format("%Y-%m-%dT%H:%M:%S%.f")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            Value::Selection(s) => write!(f, "{s}"),
            Value::Error(e) => write!(f, "{e}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::BigDecimal(d)
    }
}

impl From<ExpressionNumber> for Value {
    fn from(n: ExpressionNumber) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Value::DateTime(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl From<Selection> for Value {
    fn from(s: Selection) -> Self {
        Value::Selection(s)
    }
}

impl From<CellReference> for Value {
    fn from(cell: CellReference) -> Self {
        Value::Selection(Selection::Cell(cell))
    }
}

impl From<CellRange> for Value {
    fn from(range: CellRange) -> Self {
        Value::Selection(Selection::CellRange(range))
    }
}

impl From<ColumnReference> for Value {
    fn from(column: ColumnReference) -> Self {
        Value::Selection(Selection::Column(column))
    }
}

impl From<ColumnRange> for Value {
    fn from(range: ColumnRange) -> Self {
        Value::Selection(Selection::ColumnRange(range))
    }
}

impl From<RowReference> for Value {
    fn from(row: RowReference) -> Self {
        Value::Selection(Selection::Row(row))
    }
}

impl From<RowRange> for Value {
    fn from(range: RowRange) -> Self {
        Value::Selection(Selection::RowRange(range))
    }
}

impl From<LabelName> for Value {
    fn from(label: LabelName) -> Self {
        Value::Selection(Selection::Label(label))
    }
}

impl From<SpreadsheetError> for Value {
    fn from(e: SpreadsheetError) -> Self {
        Value::Error(e)
    }
}

/// Type tag naming what a conversion should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    Boolean,
    Char,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    /// Expression number of the context's kind
    Number,
    Text,
    Date,
    DateTime,
    Time,
    Cell,
    CellRange,
    Column,
    ColumnRange,
    Row,
    RowRange,
    Label,
    /// A cell or a cell range
    CellOrCellRange,
    /// Any selection
    Selection,
    Error,
}

impl ValueType {
    /// Every type tag, in declaration order
    pub const ALL: [ValueType; 25] = [
        ValueType::Boolean,
        ValueType::Char,
        ValueType::Byte,
        ValueType::Short,
        ValueType::Integer,
        ValueType::Long,
        ValueType::Float,
        ValueType::Double,
        ValueType::BigInteger,
        ValueType::BigDecimal,
        ValueType::Number,
        ValueType::Text,
        ValueType::Date,
        ValueType::DateTime,
        ValueType::Time,
        ValueType::Cell,
        ValueType::CellRange,
        ValueType::Column,
        ValueType::ColumnRange,
        ValueType::Row,
        ValueType::RowRange,
        ValueType::Label,
        ValueType::CellOrCellRange,
        ValueType::Selection,
        ValueType::Error,
    ];

    /// Every numeric representation
    pub const NUMERIC: [ValueType; 9] = [
        ValueType::Byte,
        ValueType::Short,
        ValueType::Integer,
        ValueType::Long,
        ValueType::Float,
        ValueType::Double,
        ValueType::BigInteger,
        ValueType::BigDecimal,
        ValueType::Number,
    ];

    /// Type of a selection value
    pub fn of_selection(selection: &Selection) -> ValueType {
        match selection {
            Selection::Cell(_) => ValueType::Cell,
            Selection::CellRange(_) => ValueType::CellRange,
            Selection::Column(_) => ValueType::Column,
            Selection::ColumnRange(_) => ValueType::ColumnRange,
            Selection::Row(_) => ValueType::Row,
            Selection::RowRange(_) => ValueType::RowRange,
            Selection::Label(_) => ValueType::Label,
        }
    }

    /// Short display name
    pub fn label(&self) -> &'static str {
        match self {
            ValueType::Boolean => "Boolean",
            ValueType::Char => "Char",
            ValueType::Byte => "Byte",
            ValueType::Short => "Short",
            ValueType::Integer => "Integer",
            ValueType::Long => "Long",
            ValueType::Float => "Float",
            ValueType::Double => "Double",
            ValueType::BigInteger => "BigInteger",
            ValueType::BigDecimal => "BigDecimal",
            ValueType::Number => "Number",
            ValueType::Text => "String",
            ValueType::Date => "Date",
            ValueType::DateTime => "DateTime",
            ValueType::Time => "Time",
            ValueType::Cell => "Cell",
            ValueType::CellRange => "CellRange",
            ValueType::Column => "Column",
            ValueType::ColumnRange => "ColumnRange",
            ValueType::Row => "Row",
            ValueType::RowRange => "RowRange",
            ValueType::Label => "Label",
            ValueType::CellOrCellRange => "CellOrCellRange",
            ValueType::Selection => "Selection",
            ValueType::Error => "Error",
        }
    }

    /// Fully qualified name of the Rust type holding values of this tag
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueType::Boolean => "bool",
            ValueType::Char => "char",
            ValueType::Byte => "i8",
            ValueType::Short => "i16",
            ValueType::Integer => "i32",
            ValueType::Long => "i64",
            ValueType::Float => "f32",
            ValueType::Double => "f64",
            ValueType::BigInteger => "i128",
            ValueType::BigDecimal => "rust_decimal::Decimal",
            ValueType::Number => "duke_convert_core::ExpressionNumber",
            ValueType::Text => "alloc::string::String",
            ValueType::Date => "chrono::NaiveDate",
            ValueType::DateTime => "chrono::NaiveDateTime",
            ValueType::Time => "chrono::NaiveTime",
            ValueType::Cell => "duke_convert_core::CellReference",
            ValueType::CellRange => "duke_convert_core::CellRange",
            ValueType::Column => "duke_convert_core::ColumnReference",
            ValueType::ColumnRange => "duke_convert_core::ColumnRange",
            ValueType::Row => "duke_convert_core::RowReference",
            ValueType::RowRange => "duke_convert_core::RowRange",
            ValueType::Label => "duke_convert_core::LabelName",
            ValueType::CellOrCellRange => "duke_convert_core::CellOrCellRange",
            ValueType::Selection => "duke_convert_core::Selection",
            ValueType::Error => "duke_convert_core::SpreadsheetError",
        }
    }

    /// Parse either a fully qualified type name or a short label (case-insensitive)
    pub fn parse(text: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.type_name() == text || t.label().eq_ignore_ascii_case(text))
            .ok_or_else(|| Error::UnknownType(text.to_string()))
    }

    /// Whether values of `other` can be used where `self` is requested
    pub fn is_assignable_from(&self, other: ValueType) -> bool {
        *self == other
            || match self {
                ValueType::Selection => other.is_selection(),
                ValueType::CellOrCellRange => {
                    matches!(other, ValueType::Cell | ValueType::CellRange)
                }
                _ => false,
            }
    }

    /// Any numeric representation, including expression numbers
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueType::Byte
                | ValueType::Short
                | ValueType::Integer
                | ValueType::Long
                | ValueType::Float
                | ValueType::Double
                | ValueType::BigInteger
                | ValueType::BigDecimal
                | ValueType::Number
        )
    }

    /// Numeric representations that only hold whole numbers
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            ValueType::Byte
                | ValueType::Short
                | ValueType::Integer
                | ValueType::Long
                | ValueType::BigInteger
        )
    }

    /// Any selection type, including the union types
    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            ValueType::Cell
                | ValueType::CellRange
                | ValueType::Column
                | ValueType::ColumnRange
                | ValueType::Row
                | ValueType::RowRange
                | ValueType::Label
                | ValueType::CellOrCellRange
                | ValueType::Selection
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.type_name())
    }
}

impl<'de> Deserialize<'de> for ValueType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        ValueType::parse(&name).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_type() {
        assert_eq!(Value::from(true).value_type(), Some(ValueType::Boolean));
        assert_eq!(Value::from("a").value_type(), Some(ValueType::Text));
        assert_eq!(Value::Empty.value_type(), None);
        assert_eq!(
            Value::from(Selection::parse("A1:B2").unwrap()).value_type(),
            Some(ValueType::CellRange)
        );
    }

    #[test]
    fn test_assignable() {
        let cell = Value::from(CellReference::parse("Z99").unwrap());
        assert!(cell.is_assignable_to(ValueType::Cell));
        assert!(cell.is_assignable_to(ValueType::CellOrCellRange));
        assert!(cell.is_assignable_to(ValueType::Selection));
        assert!(!cell.is_assignable_to(ValueType::Column));
        assert!(!Value::Empty.is_assignable_to(ValueType::Text));

        let column = Value::from(ColumnReference::parse("B").unwrap());
        assert!(!column.is_assignable_to(ValueType::CellOrCellRange));
    }

    #[test]
    fn test_type_names_round_trip() {
        for t in ValueType::ALL {
            assert_eq!(ValueType::parse(t.type_name()).unwrap(), t);
            assert_eq!(ValueType::parse(&t.label().to_lowercase()).unwrap(), t);
        }
        assert!(ValueType::parse("java.lang.Object").is_err());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from(false).to_string(), "FALSE");
        assert_eq!(
            Value::from(NaiveDate::from_ymd_opt(2000, 12, 31).unwrap()).to_string(),
            "2000-12-31"
        );
        assert_eq!(
            Value::from(NaiveTime::from_hms_opt(12, 0, 0).unwrap()).to_string(),
            "12:00:00"
        );
        assert_eq!(Value::Empty.to_string(), "");
    }

    #[test]
    fn test_serde_type_name() {
        let json = serde_json::to_string(&ValueType::Text).unwrap();
        assert_eq!(json, "\"alloc::string::String\"");
        let back: ValueType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ValueType::Text);
    }
}
