//! Policies for spreadsheet error values
//!
//! Each call site picks one:
//! - [`ErrorThrowingConverter`] aborts the whole conversion with the error
//! - [`ErrorToNumberConverter`] turns "not found" errors into zero
//! - [`ErrorToTextConverter`] renders the error token
//!
//! None of them accept values that are not errors.

use crate::bridge::number_to;
use crate::context::ConverterContext;
use crate::converter::Converter;
use crate::error::{ConvertError, ConvertResult};
use duke_convert_core::{Value, ValueType};
use rust_decimal::Decimal;
use std::fmt;
use tracing::debug;

/// Raises any error value as [`ConvertError::Thrown`], whatever the target
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorThrowingConverter;

impl Converter for ErrorThrowingConverter {
    fn can_convert(&self, value: &Value, _target: ValueType, _ctx: &ConverterContext<'_>) -> bool {
        value.is_error()
    }

    fn convert(
        &self,
        value: &Value,
        target: ValueType,
        _ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        match value {
            Value::Error(error) => {
                debug!(%error, %target, "throwing spreadsheet error");
                Err(ConvertError::Thrown(error.clone()))
            }
            _ => Err(ConvertError::unsupported(value, target)),
        }
    }
}

impl fmt::Display for ErrorThrowingConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Error throwing")
    }
}

/// Converts "not found" errors to zero of a numeric target
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorToNumberConverter;

impl Converter for ErrorToNumberConverter {
    fn can_convert(&self, value: &Value, target: ValueType, _ctx: &ConverterContext<'_>) -> bool {
        value.is_error() && target.is_numeric()
    }

    fn convert(
        &self,
        value: &Value,
        target: ValueType,
        ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        match value {
            Value::Error(error) if error.is_not_found() => number_to(Decimal::ZERO, target, ctx),
            _ => Err(ConvertError::unsupported(value, target)),
        }
    }
}

impl fmt::Display for ErrorToNumberConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Error to Number")
    }
}

/// Renders an error as its kind token, e.g. `#DIV/0!`
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorToTextConverter;

impl Converter for ErrorToTextConverter {
    fn can_convert(&self, value: &Value, target: ValueType, _ctx: &ConverterContext<'_>) -> bool {
        value.is_error() && target == ValueType::Text
    }

    fn convert(
        &self,
        value: &Value,
        target: ValueType,
        _ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        match value {
            Value::Error(error) if error.kind.is_renderable() && target == ValueType::Text => {
                Ok(Value::text(error.kind.as_str()))
            }
            _ => Err(ConvertError::unsupported(value, target)),
        }
    }
}

impl fmt::Display for ErrorToTextConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Error to String")
    }
}
