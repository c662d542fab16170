//! Spreadsheet format and parse patterns
//!
//! Patterns follow the familiar spreadsheet syntax: `0.00`, `#,##0`, `yyyy-mm-dd`,
//! `h:mm AM/PM`, `"N" #` and so on. A format pattern turns a value into text using
//! the context's symbols; a parse pattern reads text back into a value.
//!
//! ```
//! use duke_convert::pattern::SpreadsheetFormatPattern;
//! use duke_convert::ConverterContext;
//! use duke_convert_core::Value;
//!
//! let pattern = SpreadsheetFormatPattern::number("#,##0.00").unwrap();
//! let text = pattern.format(&Value::Double(1234.5), &ConverterContext::simple()).unwrap();
//! assert_eq!(text, "1,234.50");
//! ```

mod converter;
mod date_time;
mod number;
mod token;

pub use converter::{FormatPatternConverter, ParsePatternConverter};

use crate::bridge::{number_to, to_number};
use crate::category::ValueCategory;
use crate::context::ConverterContext;
use crate::error::{describe, ConvertError, ConvertResult, PatternError, PatternResult};
use chrono::{NaiveDateTime, NaiveTime};
use duke_convert_core::{Value, ValueType};
use serde::{Deserialize, Serialize};
use std::fmt;
use token::{tokenize, Token};

/// Which values a pattern formats, and which it parses into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpreadsheetPatternKind {
    Date,
    DateTime,
    Number,
    Text,
    Time,
}

impl SpreadsheetPatternKind {
    pub fn name(&self) -> &'static str {
        match self {
            SpreadsheetPatternKind::Date => "date",
            SpreadsheetPatternKind::DateTime => "date-time",
            SpreadsheetPatternKind::Number => "number",
            SpreadsheetPatternKind::Text => "text",
            SpreadsheetPatternKind::Time => "time",
        }
    }

    /// Name used when rendering converters
    pub fn label(&self) -> &'static str {
        match self {
            SpreadsheetPatternKind::Date => "Date",
            SpreadsheetPatternKind::DateTime => "DateTime",
            SpreadsheetPatternKind::Number => "Number",
            SpreadsheetPatternKind::Text => "String",
            SpreadsheetPatternKind::Time => "Time",
        }
    }

    pub fn has_date(&self) -> bool {
        matches!(self, SpreadsheetPatternKind::Date | SpreadsheetPatternKind::DateTime)
    }

    pub fn has_time(&self) -> bool {
        matches!(self, SpreadsheetPatternKind::Time | SpreadsheetPatternKind::DateTime)
    }

    pub fn is_temporal(&self) -> bool {
        self.has_date() || self.has_time()
    }

    /// Kind of pattern a category is formatted and parsed with; booleans use text patterns
    pub fn for_category(category: ValueCategory) -> Self {
        match category {
            ValueCategory::Boolean | ValueCategory::Text => SpreadsheetPatternKind::Text,
            ValueCategory::Date => SpreadsheetPatternKind::Date,
            ValueCategory::DateTime => SpreadsheetPatternKind::DateTime,
            ValueCategory::Number => SpreadsheetPatternKind::Number,
            ValueCategory::Time => SpreadsheetPatternKind::Time,
        }
    }

    /// Most sections a format pattern of this kind may have
    fn max_format_sections(&self) -> usize {
        match self {
            SpreadsheetPatternKind::Number => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for SpreadsheetPatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pattern that renders values as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetFormatPattern {
    kind: SpreadsheetPatternKind,
    text: String,
    sections: Vec<Vec<Token>>,
}

impl SpreadsheetFormatPattern {
    pub fn parse(kind: SpreadsheetPatternKind, text: &str) -> PatternResult<Self> {
        let sections = tokenize(kind, text)?;
        if sections.len() > kind.max_format_sections() {
            return Err(PatternError::TooManySections(text.to_string()));
        }
        Ok(Self {
            kind,
            text: text.to_string(),
            sections,
        })
    }

    pub fn date(text: &str) -> PatternResult<Self> {
        Self::parse(SpreadsheetPatternKind::Date, text)
    }

    pub fn date_time(text: &str) -> PatternResult<Self> {
        Self::parse(SpreadsheetPatternKind::DateTime, text)
    }

    pub fn number(text: &str) -> PatternResult<Self> {
        Self::parse(SpreadsheetPatternKind::Number, text)
    }

    pub fn text(text: &str) -> PatternResult<Self> {
        Self::parse(SpreadsheetPatternKind::Text, text)
    }

    pub fn time(text: &str) -> PatternResult<Self> {
        Self::parse(SpreadsheetPatternKind::Time, text)
    }

    pub fn kind(&self) -> SpreadsheetPatternKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether [`format`](Self::format) accepts this value
    pub fn supports(&self, value: &Value) -> bool {
        match self.kind {
            SpreadsheetPatternKind::Number => matches!(
                ValueCategory::of_value(value),
                Some(ValueCategory::Number | ValueCategory::Boolean)
            ),
            SpreadsheetPatternKind::Date => matches!(value, Value::Date(_) | Value::DateTime(_)),
            SpreadsheetPatternKind::DateTime => {
                matches!(value, Value::Date(_) | Value::DateTime(_) | Value::Time(_))
            }
            SpreadsheetPatternKind::Time => matches!(value, Value::Time(_) | Value::DateTime(_)),
            SpreadsheetPatternKind::Text => true,
        }
    }

    pub fn format(&self, value: &Value, ctx: &ConverterContext<'_>) -> Result<String, ConvertError> {
        if !self.supports(value) {
            return Err(ConvertError::failed(format!(
                "{} pattern {:?} cannot format {}",
                self.kind.label(),
                self.text,
                describe(value)
            )));
        }
        let first = self.sections.first().map(Vec::as_slice).unwrap_or_default();
        match self.kind {
            SpreadsheetPatternKind::Number => match (value, to_number(value, ctx)) {
                (_, Ok(number)) => number::format(&self.sections, number, ctx),
                // wider than a decimal, still printable as is
                (Value::BigInteger(n), Err(_)) if self.is_general() => {
                    Ok(number::localize(&n.to_string(), ctx))
                }
                (_, Err(error)) => Err(error),
            },
            SpreadsheetPatternKind::Text => Ok(format_text(first, value)),
            _ => Ok(date_time::format(first, self.date_time_of(value, ctx)?, ctx)),
        }
    }

    fn is_general(&self) -> bool {
        matches!(self.sections.as_slice(), [section] if section.as_slice() == [Token::General])
    }

    fn date_time_of(&self, value: &Value, ctx: &ConverterContext<'_>) -> Result<NaiveDateTime, ConvertError> {
        match value {
            Value::Date(date) => Ok(date.and_time(NaiveTime::MIN)),
            Value::DateTime(date_time) => Ok(*date_time),
            Value::Time(time) => {
                let epoch = ctx.epoch_date().unwrap_or_default();
                Ok(epoch.and_time(*time))
            }
            _ => Err(ConvertError::unsupported(value, ValueType::Text)),
        }
    }
}

impl fmt::Display for SpreadsheetFormatPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn format_text(tokens: &[Token], value: &Value) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Text | Token::General => out.push_str(&value.to_string()),
            _ => {}
        }
    }
    out
}

/// Pattern that reads text into values
///
/// Each `;` separated section is an alternative; the first that matches all of the
/// text wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetParsePattern {
    kind: SpreadsheetPatternKind,
    text: String,
    alternatives: Vec<Vec<Token>>,
}

impl SpreadsheetParsePattern {
    pub fn parse(kind: SpreadsheetPatternKind, text: &str) -> PatternResult<Self> {
        Ok(Self {
            kind,
            text: text.to_string(),
            alternatives: tokenize(kind, text)?,
        })
    }

    pub fn date(text: &str) -> PatternResult<Self> {
        Self::parse(SpreadsheetPatternKind::Date, text)
    }

    pub fn date_time(text: &str) -> PatternResult<Self> {
        Self::parse(SpreadsheetPatternKind::DateTime, text)
    }

    pub fn number(text: &str) -> PatternResult<Self> {
        Self::parse(SpreadsheetPatternKind::Number, text)
    }

    pub fn text(text: &str) -> PatternResult<Self> {
        Self::parse(SpreadsheetPatternKind::Text, text)
    }

    pub fn time(text: &str) -> PatternResult<Self> {
        Self::parse(SpreadsheetPatternKind::Time, text)
    }

    pub fn kind(&self) -> SpreadsheetPatternKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether [`parse_value`](Self::parse_value) can produce this type
    pub fn supports_target(&self, target: ValueType) -> bool {
        match self.kind {
            SpreadsheetPatternKind::Number => target.is_numeric(),
            SpreadsheetPatternKind::Date => target == ValueType::Date,
            SpreadsheetPatternKind::DateTime => target == ValueType::DateTime,
            SpreadsheetPatternKind::Time => target == ValueType::Time,
            SpreadsheetPatternKind::Text => {
                matches!(target, ValueType::Text | ValueType::Char | ValueType::Boolean)
            }
        }
    }

    /// Read `text` as a value of `target`
    ///
    /// Malformed text fails with the offending character and its position.
    pub fn parse_value(&self, text: &str, target: ValueType, ctx: &ConverterContext<'_>) -> ConvertResult {
        if !self.supports_target(target) {
            return Err(ConvertError::unsupported(&Value::text(text), target));
        }
        let invalid = |position: usize| -> ConvertError {
            duke_convert_core::Error::invalid_character(text, position, self.kind.name()).into()
        };
        match self.kind {
            SpreadsheetPatternKind::Number => {
                let number = number::parse(&self.alternatives, text, ctx).map_err(invalid)?;
                number_to(number, target, ctx)
            }
            SpreadsheetPatternKind::Text => {
                let inner = parse_text(&self.alternatives, text).map_err(invalid)?;
                text_to(inner, target)
            }
            SpreadsheetPatternKind::Date => {
                let parsed = date_time::parse(&self.alternatives, text, ctx).map_err(invalid)?;
                Ok(Value::Date(parsed.date()))
            }
            SpreadsheetPatternKind::DateTime => {
                let parsed = date_time::parse(&self.alternatives, text, ctx).map_err(invalid)?;
                Ok(Value::DateTime(parsed))
            }
            SpreadsheetPatternKind::Time => {
                let parsed = date_time::parse(&self.alternatives, text, ctx).map_err(invalid)?;
                Ok(Value::Time(parsed.time()))
            }
        }
    }
}

impl fmt::Display for SpreadsheetParsePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Strip the literals around `@`, trying each alternative in turn
fn parse_text<'t>(alternatives: &[Vec<Token>], text: &'t str) -> Result<&'t str, usize> {
    let mut furthest = 0;
    for tokens in alternatives {
        let split = tokens.iter().position(|t| matches!(t, Token::Text | Token::General));
        let (prefix, suffix) = match split {
            Some(at) => (literals(&tokens[..at]), literals(&tokens[at + 1..])),
            None => (literals(tokens), String::new()),
        };
        let Some(rest) = text.strip_prefix(prefix.as_str()) else {
            let matched = text
                .chars()
                .zip(prefix.chars())
                .take_while(|(a, b)| a == b)
                .count();
            furthest = furthest.max(matched);
            continue;
        };
        match rest.strip_suffix(suffix.as_str()) {
            Some(inner) if split.is_some() || inner.is_empty() => return Ok(inner),
            _ => furthest = furthest.max(text.chars().count()),
        }
    }
    Err(furthest)
}

fn literals(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Literal(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

fn text_to(text: &str, target: ValueType) -> ConvertResult {
    match target {
        ValueType::Text => Ok(Value::text(text)),
        ValueType::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(ConvertError::unsupported(&Value::text(text), target)),
            }
        }
        ValueType::Boolean if text.eq_ignore_ascii_case("TRUE") => Ok(Value::Boolean(true)),
        ValueType::Boolean if text.eq_ignore_ascii_case("FALSE") => Ok(Value::Boolean(false)),
        _ => Err(ConvertError::unsupported(&Value::text(text), target)),
    }
}

/// Reads a text left to right, tracking the char position for error messages
pub(crate) struct TextCursor {
    chars: Vec<char>,
    position: usize,
}

impl TextCursor {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            position: 0,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn is_done(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    pub(crate) fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_ignore_case(&mut self, c: char) -> bool {
        match self.peek() {
            Some(next) if next.eq_ignore_ascii_case(&c) => {
                self.position += 1;
                true
            }
            _ => false,
        }
    }

    /// Consume `literal`, ignoring ASCII case; fails at the first character that differs
    pub(crate) fn expect(&mut self, literal: &str) -> Result<(), usize> {
        for c in literal.chars() {
            if !self.eat_ignore_case(c) {
                return Err(self.position);
            }
        }
        Ok(())
    }

    /// Consume an optional sign, returning whether it was negative
    pub(crate) fn sign(&mut self, negative: char, positive: char) -> bool {
        if self.eat(negative) {
            true
        } else {
            self.eat(positive);
            false
        }
    }

    /// Consume a run of ASCII digits, skipping `group` separators between digits
    pub(crate) fn digits(&mut self, group: Option<char>) -> String {
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.position += 1;
            } else if Some(c) == group
                && !digits.is_empty()
                && self.chars.get(self.position + 1).is_some_and(char::is_ascii_digit)
            {
                self.position += 1;
            } else {
                break;
            }
        }
        digits
    }

    /// Consume up to `max` ASCII digits
    pub(crate) fn digits_max(&mut self, max: usize) -> String {
        let mut digits = String::new();
        while digits.len() < max {
            match self.peek() {
                Some(c) if c.is_ascii_digit() => {
                    digits.push(c);
                    self.position += 1;
                }
                _ => break,
            }
        }
        digits
    }

    /// Consume the longest of `words` found here, ignoring case
    pub(crate) fn eat_word<'w, T>(&mut self, words: impl IntoIterator<Item = (T, &'w str)>) -> Option<T> {
        let rest = &self.chars[self.position..];
        let best = words
            .into_iter()
            .filter(|(_, word)| !word.is_empty())
            .filter_map(|(value, word)| {
                let length = word.chars().count();
                let matches = rest.len() >= length
                    && rest
                        .iter()
                        .zip(word.chars())
                        .all(|(a, b)| a.to_lowercase().eq(b.to_lowercase()));
                matches.then_some((length, value))
            })
            .fold(None, |best: Option<(usize, T)>, candidate| match best {
                Some(current) if current.0 >= candidate.0 => Some(current),
                _ => Some(candidate),
            });
        best.map(|(length, value)| {
            self.position += length;
            value
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_section_limits() {
        assert!(SpreadsheetFormatPattern::number("0;(0);\"zero\"").is_ok());
        assert_eq!(
            SpreadsheetFormatPattern::number("0;0;0;0"),
            Err(PatternError::TooManySections("0;0;0;0".into()))
        );
        assert_eq!(
            SpreadsheetFormatPattern::date("yyyy;dd"),
            Err(PatternError::TooManySections("yyyy;dd".into()))
        );
        assert!(SpreadsheetParsePattern::date("yyyy-mm-dd;dd/mm/yyyy;yyyymmdd").is_ok());
        assert_eq!(SpreadsheetParsePattern::text(""), Err(PatternError::Empty));
    }

    #[test]
    fn test_format_support() {
        let ctx = ConverterContext::simple();
        let date = SpreadsheetFormatPattern::date("yyyy-mm-dd").unwrap();
        assert!(date.format(&Value::Double(1.0), &ctx).is_err());

        let number = SpreadsheetFormatPattern::number("0").unwrap();
        assert_eq!(number.format(&Value::Boolean(true), &ctx).unwrap(), "1");
        assert!(!number.supports(&Value::text("1")));

        let time = SpreadsheetFormatPattern::time("hh:mm").unwrap();
        let noon = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(12, 30, 0).unwrap();
        assert_eq!(time.format(&Value::DateTime(noon), &ctx).unwrap(), "12:30");
    }

    #[test]
    fn test_text_patterns() {
        let ctx = ConverterContext::simple();
        let format = SpreadsheetFormatPattern::text("\"<\"@\">\"").unwrap();
        assert_eq!(format.format(&Value::Boolean(true), &ctx).unwrap(), "<TRUE>");

        let parse = SpreadsheetParsePattern::text("\"<\"@\">\"").unwrap();
        assert_eq!(
            parse.parse_value("<abc>", ValueType::Text, &ctx).unwrap(),
            Value::text("abc")
        );
        assert_eq!(
            parse.parse_value("<false>", ValueType::Boolean, &ctx).unwrap(),
            Value::Boolean(false)
        );
        assert_eq!(
            parse.parse_value("<x>", ValueType::Char, &ctx).unwrap(),
            Value::Char('x')
        );
        assert_eq!(
            parse
                .parse_value("[abc]", ValueType::Text, &ctx)
                .unwrap_err()
                .to_string(),
            "Invalid character '[' at 0 in \"[abc]\""
        );
    }

    #[test]
    fn test_parse_errors_name_position() {
        let ctx = ConverterContext::simple();
        let pattern = SpreadsheetParsePattern::number("0.00").unwrap();
        assert_eq!(
            pattern
                .parse_value("12x5", ValueType::Double, &ctx)
                .unwrap_err()
                .to_string(),
            "Invalid character 'x' at 2 in \"12x5\""
        );
        assert!(!pattern.supports_target(ValueType::Date));
    }

    #[test]
    fn test_numbers_beyond_decimal_range() {
        let ctx = ConverterContext::simple();
        let percent = SpreadsheetFormatPattern::number("0%").unwrap();
        for value in [Value::Double(1e27), Value::BigDecimal(rust_decimal::Decimal::MAX)] {
            assert!(matches!(
                percent.format(&value, &ctx),
                Err(ConvertError::Failed { .. })
            ));
        }

        let wide = Value::BigInteger(-i128::MAX);
        let general = SpreadsheetFormatPattern::number("General").unwrap();
        assert_eq!(general.format(&wide, &ctx).unwrap(), (-i128::MAX).to_string());
        let fixed = SpreadsheetFormatPattern::number("0").unwrap();
        assert!(fixed.format(&wide, &ctx).is_err());

        let parse = SpreadsheetParsePattern::number("General").unwrap();
        for text in ["1E40", "1E-40"] {
            assert_eq!(
                parse.parse_value(text, ValueType::Double, &ctx).unwrap_err().to_string(),
                format!("Invalid character 'E' at 1 in {text:?}")
            );
        }
    }

    #[test]
    fn test_date_round_trip() {
        let ctx = ConverterContext::simple();
        let date = Value::Date(NaiveDate::from_ymd_opt(2000, 12, 31).unwrap());
        let format = SpreadsheetFormatPattern::date("\\D yyyy-mm-dd").unwrap();
        let parse = SpreadsheetParsePattern::date("\\D yyyy-mm-dd").unwrap();

        let text = format.format(&date, &ctx).unwrap();
        assert_eq!(text, "D 2000-12-31");
        assert_eq!(parse.parse_value(&text, ValueType::Date, &ctx).unwrap(), date);
    }

    #[test]
    fn test_cursor_words() {
        let mut cursor = TextCursor::new("March");
        let found = cursor.eat_word([(3, "Mar"), (3, "March"), (5, "May")]);
        assert_eq!(found, Some(3));
        assert!(cursor.is_done());
    }
}
