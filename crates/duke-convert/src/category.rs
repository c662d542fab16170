//! Value categories and per-category tables

use duke_convert_core::{Value, ValueType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification driving the general converter
///
/// Values and types without a category (selections, errors, empty) are handled
/// as "general".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueCategory {
    Boolean,
    Date,
    DateTime,
    Number,
    Text,
    Time,
}

impl ValueCategory {
    pub const ALL: [ValueCategory; 6] = [
        ValueCategory::Boolean,
        ValueCategory::Date,
        ValueCategory::DateTime,
        ValueCategory::Number,
        ValueCategory::Text,
        ValueCategory::Time,
    ];

    /// Category of a runtime value
    pub fn of_value(value: &Value) -> Option<Self> {
        match value {
            Value::Empty | Value::Selection(_) | Value::Error(_) => None,
            Value::Boolean(_) => Some(ValueCategory::Boolean),
            Value::Char(_) | Value::Text(_) => Some(ValueCategory::Text),
            Value::Byte(_)
            | Value::Short(_)
            | Value::Integer(_)
            | Value::Long(_)
            | Value::Float(_)
            | Value::Double(_)
            | Value::BigInteger(_)
            | Value::BigDecimal(_)
            | Value::Number(_) => Some(ValueCategory::Number),
            Value::Date(_) => Some(ValueCategory::Date),
            Value::DateTime(_) => Some(ValueCategory::DateTime),
            Value::Time(_) => Some(ValueCategory::Time),
        }
    }

    /// Category of a requested type
    pub fn of_type(value_type: ValueType) -> Option<Self> {
        match value_type {
            ValueType::Boolean => Some(ValueCategory::Boolean),
            ValueType::Char | ValueType::Text => Some(ValueCategory::Text),
            ValueType::Byte
            | ValueType::Short
            | ValueType::Integer
            | ValueType::Long
            | ValueType::Float
            | ValueType::Double
            | ValueType::BigInteger
            | ValueType::BigDecimal
            | ValueType::Number => Some(ValueCategory::Number),
            ValueType::Date => Some(ValueCategory::Date),
            ValueType::DateTime => Some(ValueCategory::DateTime),
            ValueType::Time => Some(ValueCategory::Time),
            ValueType::Cell
            | ValueType::CellRange
            | ValueType::Column
            | ValueType::ColumnRange
            | ValueType::Row
            | ValueType::RowRange
            | ValueType::Label
            | ValueType::CellOrCellRange
            | ValueType::Selection
            | ValueType::Error => None,
        }
    }

    /// Key used when rendering a [`CategoryMapping`]
    pub fn key(&self) -> &'static str {
        match self {
            ValueCategory::Boolean => "boolean",
            ValueCategory::Date => "date",
            ValueCategory::DateTime => "dateTime",
            ValueCategory::Number => "number",
            ValueCategory::Text => "string",
            ValueCategory::Time => "time",
        }
    }

    /// Name used in converter names, e.g. "Number to Date"
    pub fn label(&self) -> &'static str {
        match self {
            ValueCategory::Boolean => "Boolean",
            ValueCategory::Date => "Date",
            ValueCategory::DateTime => "DateTime",
            ValueCategory::Number => "Number",
            ValueCategory::Text => "String",
            ValueCategory::Time => "Time",
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            ValueCategory::Date | ValueCategory::DateTime | ValueCategory::Time
        )
    }
}

impl fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One `T` per [`ValueCategory`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMapping<T> {
    pub boolean: T,
    pub date: T,
    pub date_time: T,
    pub number: T,
    #[serde(rename = "string")]
    pub text: T,
    pub time: T,
}

impl<T> CategoryMapping<T> {
    /// Build a mapping by calling `f` once per category
    pub fn from_fn(mut f: impl FnMut(ValueCategory) -> T) -> Self {
        Self {
            boolean: f(ValueCategory::Boolean),
            date: f(ValueCategory::Date),
            date_time: f(ValueCategory::DateTime),
            number: f(ValueCategory::Number),
            text: f(ValueCategory::Text),
            time: f(ValueCategory::Time),
        }
    }

    /// Build a mapping where `f` may fail for any category
    pub fn try_from_fn<E>(mut f: impl FnMut(ValueCategory) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            boolean: f(ValueCategory::Boolean)?,
            date: f(ValueCategory::Date)?,
            date_time: f(ValueCategory::DateTime)?,
            number: f(ValueCategory::Number)?,
            text: f(ValueCategory::Text)?,
            time: f(ValueCategory::Time)?,
        })
    }

    pub fn get(&self, category: ValueCategory) -> &T {
        match category {
            ValueCategory::Boolean => &self.boolean,
            ValueCategory::Date => &self.date,
            ValueCategory::DateTime => &self.date_time,
            ValueCategory::Number => &self.number,
            ValueCategory::Text => &self.text,
            ValueCategory::Time => &self.time,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(ValueCategory, &T) -> U) -> CategoryMapping<U> {
        CategoryMapping::from_fn(|c| f(c, self.get(c)))
    }

    /// Entries in category order
    pub fn iter(&self) -> impl Iterator<Item = (ValueCategory, &T)> + '_ {
        ValueCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

impl<T: fmt::Display> fmt::Display for CategoryMapping<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (category, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", category.key(), value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use duke_convert_core::{CellReference, ExpressionNumber};

    #[test]
    fn test_of_value() {
        assert_eq!(
            ValueCategory::of_value(&Value::Number(ExpressionNumber::Double(1.0))),
            Some(ValueCategory::Number)
        );
        assert_eq!(
            ValueCategory::of_value(&Value::Char('x')),
            Some(ValueCategory::Text)
        );
        assert_eq!(
            ValueCategory::of_value(&Value::from(NaiveTime::MIN)),
            Some(ValueCategory::Time)
        );
        assert_eq!(
            ValueCategory::of_value(&Value::from(CellReference::parse("A1").unwrap())),
            None
        );
        assert_eq!(ValueCategory::of_value(&Value::Empty), None);
    }

    #[test]
    fn test_of_type_agrees_with_of_value() {
        let samples = [
            Value::from(true),
            Value::Byte(1),
            Value::BigInteger(1),
            Value::from("a"),
            Value::Char('a'),
        ];
        for sample in samples {
            let value_type = sample.value_type().unwrap();
            assert_eq!(
                ValueCategory::of_type(value_type),
                ValueCategory::of_value(&sample)
            );
        }
        assert_eq!(ValueCategory::of_type(ValueType::Selection), None);
        assert_eq!(ValueCategory::of_type(ValueType::Error), None);
    }

    #[test]
    fn test_mapping_display() {
        let mapping = CategoryMapping::from_fn(|c| c.key().len());
        assert_eq!(
            mapping.to_string(),
            "boolean=7, date=4, dateTime=8, number=6, string=6, time=4"
        );
        assert_eq!(*mapping.get(ValueCategory::DateTime), 8);
    }

    #[test]
    fn test_mapping_serde_keys() {
        let mapping = CategoryMapping::from_fn(|c| c.label());
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(json["dateTime"], "DateTime");
        assert_eq!(json["string"], "String");
    }
}
