//! The general converter: dispatch on value categories
//!
//! Pairs of non-text categories convert through [`BridgeConverter`] arithmetic.
//! Everything involving text goes through the patterns: the value is formatted
//! with its category's format pattern, then the text is read with the target
//! category's parse pattern.

use crate::bridge::{number_to, BridgeConverter};
use crate::category::{CategoryMapping, ValueCategory};
use crate::context::{ConverterContext, ConverterSettings};
use crate::converter::Converter;
use crate::error::{ConvertError, ConvertResult, PatternError, PatternResult};
use crate::pattern::{SpreadsheetFormatPattern, SpreadsheetParsePattern, SpreadsheetPatternKind};
use chrono::NaiveTime;
use duke_convert_core::{ExpressionNumber, Value, ValueType};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Format and parse pattern text for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternPair {
    pub format: String,
    pub parse: String,
}

impl PatternPair {
    pub fn new(format: impl Into<String>, parse: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            parse: parse.into(),
        }
    }

    /// Patterns the general converter uses unless configured otherwise
    pub fn defaults() -> CategoryMapping<PatternPair> {
        CategoryMapping {
            boolean: PatternPair::new("@", "@"),
            date: PatternPair::new("yyyy-mm-dd", "yyyy-mm-dd"),
            date_time: PatternPair::new("yyyy-mm-dd hh:mm:ss", "yyyy-mm-dd hh:mm:ss"),
            number: PatternPair::new("General", "General"),
            text: PatternPair::new("@", "@"),
            time: PatternPair::new("hh:mm:ss", "hh:mm:ss"),
        }
    }
}

/// What happens when text longer than one character is asked for as a char
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CharNarrowing {
    /// Only single character text converts
    #[default]
    Strict,
    /// Keep the first character, failing only for empty text
    First,
}

/// Converts between booleans, numbers, text, dates, date-times and times
///
/// Selections only convert to text here, and errors not at all; see the
/// selection and error converters for those.
#[derive(Debug, Clone)]
pub struct GeneralConverter {
    formatters: CategoryMapping<SpreadsheetFormatPattern>,
    parsers: CategoryMapping<SpreadsheetParsePattern>,
    bridges: CategoryMapping<CategoryMapping<Option<BridgeConverter>>>,
    char_narrowing: CharNarrowing,
}

impl GeneralConverter {
    /// Build from one format and one parse pattern per category
    ///
    /// Each pattern must be of the kind its category uses, see
    /// [`SpreadsheetPatternKind::for_category`].
    pub fn new(
        formatters: CategoryMapping<SpreadsheetFormatPattern>,
        parsers: CategoryMapping<SpreadsheetParsePattern>,
    ) -> PatternResult<Self> {
        for category in ValueCategory::ALL {
            let expected = SpreadsheetPatternKind::for_category(category);
            let format = formatters.get(category);
            check_kind(expected, format.kind(), format.as_str())?;
            let parse = parsers.get(category);
            check_kind(expected, parse.kind(), parse.as_str())?;
        }
        Ok(Self {
            formatters,
            parsers,
            bridges: CategoryMapping::from_fn(|source| {
                CategoryMapping::from_fn(|target| BridgeConverter::new(source, target))
            }),
            char_narrowing: CharNarrowing::default(),
        })
    }

    /// Build from pattern text
    pub fn from_patterns(patterns: &CategoryMapping<PatternPair>) -> PatternResult<Self> {
        let formatters = CategoryMapping::try_from_fn(|category| {
            let pair = patterns.get(category);
            SpreadsheetFormatPattern::parse(SpreadsheetPatternKind::for_category(category), &pair.format)
        })?;
        let parsers = CategoryMapping::try_from_fn(|category| {
            let pair = patterns.get(category);
            SpreadsheetParsePattern::parse(SpreadsheetPatternKind::for_category(category), &pair.parse)
        })?;
        Self::new(formatters, parsers)
    }

    pub fn from_settings(settings: &ConverterSettings) -> PatternResult<Self> {
        Self::from_patterns(&settings.patterns)
    }

    pub fn with_char_narrowing(self, char_narrowing: CharNarrowing) -> Self {
        Self {
            char_narrowing,
            ..self
        }
    }

    pub fn char_narrowing(&self) -> CharNarrowing {
        self.char_narrowing
    }

    pub fn formatters(&self) -> &CategoryMapping<SpreadsheetFormatPattern> {
        &self.formatters
    }

    pub fn parsers(&self) -> &CategoryMapping<SpreadsheetParsePattern> {
        &self.parsers
    }

    /// Direct converter between two categories, if they have one
    pub fn bridge(&self, source: ValueCategory, target: ValueCategory) -> Option<&BridgeConverter> {
        self.bridges.get(source).get(target).as_ref()
    }

    /// Already the requested type; numbers must also be of the context's kind
    fn is_identity(value: &Value, target: ValueType, ctx: &ConverterContext<'_>) -> bool {
        match value {
            Value::Number(number) if target == ValueType::Number => number.kind() == ctx.number_kind,
            _ => value.is_assignable_to(target),
        }
    }

    fn convert_empty(&self, target: ValueType, ctx: &ConverterContext<'_>) -> ConvertResult {
        match target {
            ValueType::Boolean => Ok(Value::Boolean(false)),
            ValueType::Text => Ok(Value::text("")),
            ValueType::Date => epoch(ctx).map(Value::Date),
            ValueType::Time => Ok(Value::Time(NaiveTime::MIN)),
            ValueType::DateTime => epoch(ctx).map(|date| Value::DateTime(date.and_time(NaiveTime::MIN))),
            _ if target.is_numeric() => {
                let missing = missing_cell_number(&ctx.missing_cell_number)?;
                number_to(missing, target, ctx)
            }
            _ => Err(ConvertError::unsupported(&Value::Empty, target)),
        }
    }

    fn narrow_char(&self, text: Value) -> ConvertResult {
        let Value::Text(text) = text else {
            return Err(ConvertError::unsupported(&text, ValueType::Char));
        };
        let mut chars = text.chars();
        match (chars.next(), chars.next(), self.char_narrowing) {
            (Some(c), None, _) | (Some(c), Some(_), CharNarrowing::First) => Ok(Value::Char(c)),
            _ => Err(ConvertError::unsupported(&Value::Text(text), ValueType::Char)),
        }
    }

    /// Format with the source category's pattern, then parse with the target's
    fn through_text(
        &self,
        value: &Value,
        source: Option<ValueCategory>,
        target: ValueType,
        target_category: ValueCategory,
        ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        let text = match source {
            Some(category) => self.formatters.get(category).format(value, ctx)?,
            None => value.to_string(),
        };
        let parser = self.parsers.get(target_category);
        trace!(%text, pattern = %parser, %target, "converting through text");
        parser.parse_value(&text, target, ctx)
    }
}

impl Default for GeneralConverter {
    fn default() -> Self {
        Self::from_patterns(&PatternPair::defaults()).expect("default patterns are valid")
    }
}

fn check_kind(expected: SpreadsheetPatternKind, actual: SpreadsheetPatternKind, pattern: &str) -> PatternResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(PatternError::WrongKind {
            expected: expected.name(),
            actual: actual.name(),
            pattern: pattern.to_string(),
        })
    }
}

fn epoch(ctx: &ConverterContext<'_>) -> Result<chrono::NaiveDate, ConvertError> {
    ctx.epoch_date()
        .ok_or_else(|| ConvertError::failed(format!("Invalid date offset {}", ctx.date_offset)))
}

fn missing_cell_number(number: &ExpressionNumber) -> Result<rust_decimal::Decimal, ConvertError> {
    number
        .to_decimal()
        .ok_or_else(|| ConvertError::failed(format!("Invalid missing cell number {number}")))
}

impl Converter for GeneralConverter {
    fn can_convert(&self, value: &Value, target: ValueType, ctx: &ConverterContext<'_>) -> bool {
        if value.is_error() {
            return false;
        }
        if Self::is_identity(value, target, ctx) {
            return true;
        }
        let Some(target_category) = ValueCategory::of_type(target) else {
            return false;
        };
        match (value, ValueCategory::of_value(value)) {
            (Value::Empty, _) => target != ValueType::Char,
            (_, None) => target == ValueType::Text,
            (_, Some(source)) => !matches!(
                (source, target_category),
                (ValueCategory::Date, ValueCategory::Time) | (ValueCategory::Time, ValueCategory::Date)
            ),
        }
    }

    fn convert(
        &self,
        value: &Value,
        target: ValueType,
        ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        if value.is_error() {
            return Err(ConvertError::unsupported(value, target));
        }
        if Self::is_identity(value, target, ctx) {
            return Ok(value.clone());
        }
        let Some(target_category) = ValueCategory::of_type(target) else {
            return Err(ConvertError::unsupported(value, target));
        };
        if target == ValueType::Char {
            let text = self.convert(value, ValueType::Text, ctx)?;
            return self.narrow_char(text);
        }
        if value.is_empty() {
            return self.convert_empty(target, ctx);
        }

        let source = ValueCategory::of_value(value);
        match source {
            None if target != ValueType::Text => Err(ConvertError::unsupported(value, target)),
            Some(source) => match self.bridge(source, target_category) {
                Some(bridge) => bridge.convert(value, target, ctx),
                None if source.is_temporal() && target_category.is_temporal() => {
                    Err(ConvertError::unsupported(value, target))
                }
                None => self.through_text(value, Some(source), target, target_category, ctx),
            },
            None => self.through_text(value, None, target, target_category, ctx),
        }
    }
}

impl fmt::Display for GeneralConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("General")
    }
}
