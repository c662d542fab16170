//! JSON form of values
//!
//! Values are written as JSON natives where one exists (booleans, numbers, strings);
//! temporal values and selections use their text form and errors become
//! `{"kind": "#DIV/0!", "message": ".."}`. Reading needs the [`ValueType`] to pick the
//! variant back out.

use crate::error::{Error, Result};
use crate::number::ExpressionNumber;
use crate::selection::{
    CellRange, CellReference, ColumnRange, ColumnReference, LabelName, RowRange, RowReference,
    Selection,
};
use crate::spreadsheet_error::SpreadsheetErrorKind;
use crate::value::{Value, ValueType};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde_json::{json, Number};
use std::str::FromStr;

impl Value {
    /// Marshall this value to JSON
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Empty => serde_json::Value::Null,
            Value::Boolean(b) => json!(b),
            Value::Char(c) => json!(c.to_string()),
            Value::Byte(n) => json!(n),
            Value::Short(n) => json!(n),
            Value::Integer(n) => json!(n),
            Value::Long(n) => json!(n),
            Value::Float(n) => float_json(*n as f64, || n.to_string()),
            Value::Double(n) => float_json(*n, || n.to_string()),
            Value::BigInteger(n) => match i64::try_from(*n) {
                Ok(small) => json!(small),
                Err(_) => json!(n.to_string()),
            },
            Value::BigDecimal(d) => decimal_json(d),
            Value::Number(ExpressionNumber::Double(n)) => float_json(*n, || n.to_string()),
            Value::Number(ExpressionNumber::BigDecimal(d)) => decimal_json(d),
            Value::Text(s) => json!(s),
            Value::Date(_) | Value::DateTime(_) | Value::Time(_) | Value::Selection(_) => {
                json!(self.to_string())
            }
            Value::Error(e) => json!({
                "kind": e.kind.as_str(),
                "message": e.message,
            }),
        }
    }

    /// Unmarshall a value of the given type from JSON
    pub fn from_json(json: &serde_json::Value, value_type: ValueType) -> Result<Value> {
        if json.is_null() {
            return Ok(Value::Empty);
        }
        let invalid = || Error::InvalidJson {
            expected: value_type.label(),
            actual: json.to_string(),
        };

        let value = match value_type {
            ValueType::Boolean => Value::Boolean(json.as_bool().ok_or_else(invalid)?),
            ValueType::Char => {
                let text = json.as_str().ok_or_else(invalid)?;
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Value::Char(c),
                    _ => return Err(invalid()),
                }
            }
            ValueType::Byte => Value::Byte(int_json(json).ok_or_else(invalid)?),
            ValueType::Short => Value::Short(int_json(json).ok_or_else(invalid)?),
            ValueType::Integer => Value::Integer(int_json(json).ok_or_else(invalid)?),
            ValueType::Long => Value::Long(int_json(json).ok_or_else(invalid)?),
            ValueType::Float => Value::Float(json.as_f64().ok_or_else(invalid)? as f32),
            ValueType::Double => Value::Double(json.as_f64().ok_or_else(invalid)?),
            ValueType::BigInteger => Value::BigInteger(
                number_text(json)
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(invalid)?,
            ),
            ValueType::BigDecimal => Value::BigDecimal(decimal_from_json(json).ok_or_else(invalid)?),
            ValueType::Number => match json {
                serde_json::Value::Number(n) => {
                    Value::Number(ExpressionNumber::Double(n.as_f64().ok_or_else(invalid)?))
                }
                _ => Value::Number(ExpressionNumber::BigDecimal(
                    decimal_from_json(json).ok_or_else(invalid)?,
                )),
            },
            ValueType::Text => Value::Text(json.as_str().ok_or_else(invalid)?.to_string()),
            ValueType::Date => Value::Date(
                NaiveDate::from_str(json.as_str().ok_or_else(invalid)?).map_err(|_| invalid())?,
            ),
            ValueType::DateTime => Value::DateTime(
                NaiveDateTime::from_str(json.as_str().ok_or_else(invalid)?)
                    .map_err(|_| invalid())?,
            ),
            ValueType::Time => Value::Time(
                NaiveTime::from_str(json.as_str().ok_or_else(invalid)?).map_err(|_| invalid())?,
            ),
            ValueType::Cell => CellReference::parse(text_json(json, invalid)?)?.into(),
            ValueType::CellRange => CellRange::parse(text_json(json, invalid)?)?.into(),
            ValueType::Column => ColumnReference::parse(text_json(json, invalid)?)?.into(),
            ValueType::ColumnRange => ColumnRange::parse(text_json(json, invalid)?)?.into(),
            ValueType::Row => RowReference::parse(text_json(json, invalid)?)?.into(),
            ValueType::RowRange => RowRange::parse(text_json(json, invalid)?)?.into(),
            ValueType::Label => LabelName::parse(text_json(json, invalid)?)?.into(),
            ValueType::CellOrCellRange | ValueType::Selection => {
                Selection::parse(text_json(json, invalid)?)?.into()
            }
            ValueType::Error => {
                let kind = json
                    .get("kind")
                    .and_then(|k| k.as_str())
                    .ok_or_else(invalid)?;
                let message = json
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or_default();
                Value::Error(SpreadsheetErrorKind::parse(kind)?.with_message(message))
            }
        };
        Ok(value)
    }
}

fn float_json(n: f64, text: impl FnOnce() -> String) -> serde_json::Value {
    match Number::from_f64(n) {
        Some(number) => serde_json::Value::Number(number),
        None => json!(text()),
    }
}

fn decimal_json(d: &Decimal) -> serde_json::Value {
    json!(d.normalize().to_string())
}

fn text_json<'a>(
    json: &'a serde_json::Value,
    invalid: impl FnOnce() -> Error,
) -> Result<&'a str> {
    json.as_str().ok_or_else(invalid)
}

fn int_json<T: TryFrom<i64>>(json: &serde_json::Value) -> Option<T> {
    json.as_i64().and_then(|n| T::try_from(n).ok())
}

fn number_text(json: &serde_json::Value) -> Option<String> {
    match json {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn decimal_from_json(json: &serde_json::Value) -> Option<Decimal> {
    number_text(json).and_then(|s| Decimal::from_str(&s).ok())
}
