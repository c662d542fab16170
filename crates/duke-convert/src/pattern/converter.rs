//! Converters backed by a format or parse pattern

use super::{SpreadsheetFormatPattern, SpreadsheetParsePattern};
use crate::context::ConverterContext;
use crate::converter::Converter;
use crate::error::{ConvertError, ConvertResult};
use duke_convert_core::{Value, ValueType};
use std::fmt;

/// Renders any value its pattern supports as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPatternConverter {
    pattern: SpreadsheetFormatPattern,
}

impl FormatPatternConverter {
    pub fn new(pattern: SpreadsheetFormatPattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &SpreadsheetFormatPattern {
        &self.pattern
    }
}

impl Converter for FormatPatternConverter {
    fn can_convert(&self, value: &Value, target: ValueType, _ctx: &ConverterContext<'_>) -> bool {
        target == ValueType::Text && self.pattern.supports(value)
    }

    fn convert(
        &self,
        value: &Value,
        target: ValueType,
        ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        if target != ValueType::Text {
            return Err(ConvertError::unsupported(value, target));
        }
        self.pattern.format(value, ctx).map(Value::Text)
    }
}

impl fmt::Display for FormatPatternConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->String->{}", self.pattern.kind().label(), self.pattern)
    }
}

/// Reads text or a single char with its pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePatternConverter {
    pattern: SpreadsheetParsePattern,
}

impl ParsePatternConverter {
    pub fn new(pattern: SpreadsheetParsePattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &SpreadsheetParsePattern {
        &self.pattern
    }
}

impl Converter for ParsePatternConverter {
    fn can_convert(&self, value: &Value, target: ValueType, _ctx: &ConverterContext<'_>) -> bool {
        matches!(value, Value::Text(_) | Value::Char(_)) && self.pattern.supports_target(target)
    }

    fn convert(
        &self,
        value: &Value,
        target: ValueType,
        ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        match value {
            Value::Text(text) => self.pattern.parse_value(text, target, ctx),
            Value::Char(c) => self.pattern.parse_value(c.encode_utf8(&mut [0; 4]), target, ctx),
            _ => Err(ConvertError::unsupported(value, target)),
        }
    }
}

impl fmt::Display for ParsePatternConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "String->{}->{}", self.pattern.kind().label(), self.pattern)
    }
}
