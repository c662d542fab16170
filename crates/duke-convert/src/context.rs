//! Per-call conversion context and the settings it is built from

use crate::category::CategoryMapping;
use crate::error::ConvertError;
use crate::general::PatternPair;
use chrono::{Days, NaiveDate};
use duke_convert_core::{ExpressionNumber, ExpressionNumberKind, LabelName, LabelResolver, Selection};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days between 1970-01-01 and 1899-12-30, day zero of the 1900 date system
pub const EXCEL_1900_OFFSET: i64 = 25_569;

/// Days between 1970-01-01 and 1904-01-01, day zero of the 1904 date system
pub const EXCEL_1904_OFFSET: i64 = 24_107;

/// Which day a date number of zero refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateSystem {
    /// Day zero is 1899-12-30
    #[default]
    Excel1900,
    /// Day zero is 1904-01-01 (old Mac spreadsheets)
    Excel1904,
    /// Day zero is 1970-01-01
    Unix,
    /// Explicit offset in days from 1970-01-01
    Custom(i64),
}

impl DateSystem {
    /// Offset added to days since 1970-01-01 to get a date number
    pub fn offset(&self) -> i64 {
        match self {
            DateSystem::Excel1900 => EXCEL_1900_OFFSET,
            DateSystem::Excel1904 => EXCEL_1904_OFFSET,
            DateSystem::Unix => 0,
            DateSystem::Custom(offset) => *offset,
        }
    }
}

/// Serializable mirror of [`RoundingStrategy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    #[default]
    HalfUp,
    HalfDown,
    HalfEven,
    Up,
    Down,
    Ceiling,
    Floor,
}

impl RoundingMode {
    pub fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfDown => RoundingStrategy::MidpointTowardZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::Up => RoundingStrategy::AwayFromZero,
            RoundingMode::Down => RoundingStrategy::ToZero,
            RoundingMode::Ceiling => RoundingStrategy::ToPositiveInfinity,
            RoundingMode::Floor => RoundingStrategy::ToNegativeInfinity,
        }
    }
}

/// Locale dependent names used by date and time patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DateTimeSymbols {
    /// Markers for before and after noon
    pub am_pm: [String; 2],
    pub month_names: Vec<String>,
    pub month_name_abbreviations: Vec<String>,
    /// Starting with Sunday
    pub weekday_names: Vec<String>,
    pub weekday_name_abbreviations: Vec<String>,
}

impl DateTimeSymbols {
    /// Month name for a 1-based month
    pub fn month_name(&self, month: u32, abbreviated: bool) -> Option<&str> {
        let names = if abbreviated {
            &self.month_name_abbreviations
        } else {
            &self.month_names
        };
        names.get(month.checked_sub(1)? as usize).map(String::as_str)
    }

    /// Weekday name, counting from Sunday = 0
    pub fn weekday_name(&self, weekday: u32, abbreviated: bool) -> Option<&str> {
        let names = if abbreviated {
            &self.weekday_name_abbreviations
        } else {
            &self.weekday_names
        };
        names.get(weekday as usize).map(String::as_str)
    }

    pub fn am_pm(&self, pm: bool) -> &str {
        &self.am_pm[pm as usize]
    }
}

impl Default for DateTimeSymbols {
    fn default() -> Self {
        let strings = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            am_pm: ["AM".to_string(), "PM".to_string()],
            month_names: strings(&[
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]),
            month_name_abbreviations: strings(&[
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]),
            weekday_names: strings(&[
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
            ]),
            weekday_name_abbreviations: strings(&["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]),
        }
    }
}

/// Locale dependent characters used by number patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DecimalNumberSymbols {
    pub decimal_separator: char,
    pub group_separator: char,
    pub negative_sign: char,
    pub positive_sign: char,
    pub percent_symbol: char,
}

impl Default for DecimalNumberSymbols {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: ',',
            negative_sign: '-',
            positive_sign: '+',
            percent_symbol: '%',
        }
    }
}

/// Settings a [`ConverterContext`] and the general converter are built from
///
/// Every field has a default, so a settings file only lists what it changes:
///
/// ```
/// use duke_convert::{ConverterSettings, DateSystem};
///
/// let settings: ConverterSettings = serde_json::from_str(r#"{"date-system": "excel1904"}"#).unwrap();
/// assert_eq!(settings.date_system, DateSystem::Excel1904);
/// assert_eq!(settings.two_digit_year, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConverterSettings {
    pub date_system: DateSystem,
    pub number_kind: ExpressionNumberKind,
    pub rounding: RoundingMode,
    /// Two digit years below this are in the 2000s, the rest in the 1900s
    pub two_digit_year: u8,
    /// Number a missing cell stands for
    pub missing_cell_number: Decimal,
    pub date_time_symbols: DateTimeSymbols,
    pub decimal_number_symbols: DecimalNumberSymbols,
    /// Format and parse patterns used by the general converter
    pub patterns: CategoryMapping<PatternPair>,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            date_system: DateSystem::default(),
            number_kind: ExpressionNumberKind::default(),
            rounding: RoundingMode::default(),
            two_digit_year: 30,
            missing_cell_number: Decimal::ZERO,
            date_time_symbols: DateTimeSymbols::default(),
            decimal_number_symbols: DecimalNumberSymbols::default(),
            patterns: PatternPair::defaults(),
        }
    }
}

/// Read-only bundle handed to every conversion
#[derive(Clone)]
pub struct ConverterContext<'a> {
    pub date_time_symbols: DateTimeSymbols,
    pub decimal_number_symbols: DecimalNumberSymbols,
    /// What `ValueType::Number` resolves to
    pub number_kind: ExpressionNumberKind,
    /// Days between 1970-01-01 and the spreadsheet's day zero
    pub date_offset: i64,
    pub rounding: RoundingStrategy,
    pub two_digit_year: u8,
    pub missing_cell_number: ExpressionNumber,
    pub label_resolver: Option<&'a dyn LabelResolver>,
}

impl<'a> ConverterContext<'a> {
    /// Build a context from settings, without a label resolver
    pub fn new(settings: &ConverterSettings) -> Self {
        Self {
            date_time_symbols: settings.date_time_symbols.clone(),
            decimal_number_symbols: settings.decimal_number_symbols.clone(),
            number_kind: settings.number_kind,
            date_offset: settings.date_system.offset(),
            rounding: settings.rounding.strategy(),
            two_digit_year: settings.two_digit_year,
            missing_cell_number: settings.number_kind.from_decimal(settings.missing_cell_number),
            label_resolver: None,
        }
    }

    /// Create a default context (1900 date system, double numbers) for testing
    pub fn simple() -> Self {
        Self::new(&ConverterSettings::default())
    }

    /// Use another date offset
    pub fn with_date_offset(self, date_offset: i64) -> Self {
        Self {
            date_offset,
            ..self
        }
    }

    /// Use another expression number representation
    pub fn with_number_kind(self, number_kind: ExpressionNumberKind) -> Self {
        Self {
            missing_cell_number: self
                .missing_cell_number
                .with_kind(number_kind)
                .unwrap_or_else(|| number_kind.zero()),
            number_kind,
            ..self
        }
    }

    /// Attach a label resolver
    pub fn with_label_resolver<'b>(self, resolver: &'b dyn LabelResolver) -> ConverterContext<'b> {
        ConverterContext {
            date_time_symbols: self.date_time_symbols,
            decimal_number_symbols: self.decimal_number_symbols,
            number_kind: self.number_kind,
            date_offset: self.date_offset,
            rounding: self.rounding,
            two_digit_year: self.two_digit_year,
            missing_cell_number: self.missing_cell_number,
            label_resolver: Some(resolver),
        }
    }

    /// The date whose date number is zero
    pub fn epoch_date(&self) -> Option<NaiveDate> {
        add_days(NaiveDate::default(), -self.date_offset)
    }

    /// Expression number of the context's kind
    pub fn number(&self, value: Decimal) -> ExpressionNumber {
        self.number_kind.from_decimal(value)
    }

    /// Resolve a label through the context's resolver
    pub fn resolve_label(&self, label: &LabelName) -> Result<Selection, ConvertError> {
        let resolver = self
            .label_resolver
            .ok_or_else(|| ConvertError::failed(format!("No label resolver for {label}")))?;
        resolver
            .resolve_label(label)
            .ok_or_else(|| ConvertError::failed(format!("Label not found: {label}")))
    }
}

impl Default for ConverterContext<'_> {
    fn default() -> Self {
        Self::simple()
    }
}

impl fmt::Debug for ConverterContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterContext")
            .field("number_kind", &self.number_kind)
            .field("date_offset", &self.date_offset)
            .field("rounding", &self.rounding)
            .field("two_digit_year", &self.two_digit_year)
            .field("missing_cell_number", &self.missing_cell_number)
            .field("label_resolver", &self.label_resolver.is_some())
            .finish_non_exhaustive()
    }
}

/// Add a signed number of days, `None` outside the calendar
pub(crate) fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duke_convert_core::{CellReference, LabelMappings};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_epoch_date() {
        let ctx = ConverterContext::simple();
        assert_eq!(ctx.epoch_date(), NaiveDate::from_ymd_opt(1899, 12, 30));

        let ctx = ctx.with_date_offset(EXCEL_1904_OFFSET);
        assert_eq!(ctx.epoch_date(), NaiveDate::from_ymd_opt(1904, 1, 1));

        let ctx = ctx.with_date_offset(0);
        assert_eq!(ctx.epoch_date(), NaiveDate::from_ymd_opt(1970, 1, 1));
    }

    #[test]
    fn test_settings_json() {
        let settings: ConverterSettings = serde_json::from_str(
            r#"{
                "date-system": {"custom": 100},
                "number-kind": "big-decimal",
                "rounding": "half-even",
                "missing-cell-number": "1.5"
            }"#,
        )
        .unwrap();
        assert_eq!(settings.date_system.offset(), 100);

        let ctx = ConverterContext::new(&settings);
        assert_eq!(ctx.number_kind, ExpressionNumberKind::BigDecimal);
        assert_eq!(ctx.rounding, RoundingStrategy::MidpointNearestEven);
        assert_eq!(
            ctx.missing_cell_number,
            ExpressionNumber::BigDecimal(Decimal::new(15, 1))
        );
        assert_eq!(ctx.date_time_symbols, DateTimeSymbols::default());
    }

    #[test]
    fn test_resolve_label() {
        let label = LabelName::parse("Sales").unwrap();
        let ctx = ConverterContext::simple();
        assert_eq!(
            ctx.resolve_label(&label).unwrap_err().to_string(),
            "No label resolver for Sales"
        );

        let mut labels = LabelMappings::new();
        let cell = Selection::Cell(CellReference::parse("B2").unwrap());
        labels.define(label.clone(), cell.clone()).unwrap();
        let ctx = ConverterContext::simple().with_label_resolver(&labels);
        assert_eq!(ctx.resolve_label(&label).unwrap(), cell);

        let unknown = LabelName::parse("Costs").unwrap();
        assert_eq!(
            ctx.resolve_label(&unknown).unwrap_err().to_string(),
            "Label not found: Costs"
        );
    }

    #[test]
    fn test_symbols() {
        let symbols = DateTimeSymbols::default();
        assert_eq!(symbols.month_name(12, false), Some("December"));
        assert_eq!(symbols.month_name(0, true), None);
        assert_eq!(symbols.weekday_name(0, true), Some("Sun"));
        assert_eq!(symbols.am_pm(true), "PM");
    }
}
