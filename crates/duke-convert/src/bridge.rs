//! Arithmetic between booleans, numbers, dates, date-times and times
//!
//! Everything goes through an exact decimal:
//! - a date is its day count plus the context's date offset
//! - a time is the fraction of the day elapsed (noon is exactly 0.5)
//! - a date-time is the sum of both
//! - a boolean is 0 or 1
//!
//! Numbers become dates by truncation, date-times by splitting whole days from
//! the fraction, and times only when they are less than one day.

use crate::category::ValueCategory;
use crate::context::{add_days, ConverterContext};
use crate::converter::Converter;
use crate::error::{describe, ConvertError, ConvertResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use duke_convert_core::{Value, ValueType};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::fmt;

/// Seconds in a day
pub const SECONDS_PER_DAY: i64 = 86_400;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Converts between two non-text categories
///
/// Date and time never convert into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConverter {
    source: ValueCategory,
    target: ValueCategory,
}

impl BridgeConverter {
    /// `None` when the pair has no direct arithmetic
    pub fn new(source: ValueCategory, target: ValueCategory) -> Option<Self> {
        is_bridged(source, target).then_some(Self { source, target })
    }
}

/// Whether two categories convert through arithmetic
pub fn is_bridged(source: ValueCategory, target: ValueCategory) -> bool {
    use ValueCategory::*;
    !matches!((source, target), (Text, _) | (_, Text) | (Date, Time) | (Time, Date))
}

impl Converter for BridgeConverter {
    fn can_convert(&self, value: &Value, target: ValueType, _ctx: &ConverterContext<'_>) -> bool {
        ValueCategory::of_value(value) == Some(self.source)
            && ValueCategory::of_type(target) == Some(self.target)
    }

    fn convert(
        &self,
        value: &Value,
        target: ValueType,
        ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        match (value, target) {
            (Value::Boolean(_), ValueType::Boolean)
            | (Value::Date(_), ValueType::Date)
            | (Value::DateTime(_), ValueType::DateTime)
            | (Value::Time(_), ValueType::Time) => Ok(value.clone()),
            (Value::DateTime(dt), ValueType::Date) => Ok(Value::Date(dt.date())),
            (Value::DateTime(dt), ValueType::Time) => Ok(Value::Time(dt.time())),
            (Value::Date(d), ValueType::DateTime) => Ok(Value::DateTime(d.and_time(NaiveTime::MIN))),
            (Value::Time(t), ValueType::DateTime) => Ok(Value::DateTime(epoch(ctx)?.and_time(*t))),
            _ => number_to(to_number(value, ctx)?, target, ctx),
        }
    }
}

impl fmt::Display for BridgeConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.source, self.target)
    }
}

/// Decimal value of a boolean, number or temporal value
pub fn to_number(value: &Value, ctx: &ConverterContext<'_>) -> Result<Decimal, ConvertError> {
    let number = match value {
        Value::Boolean(b) => Some(if *b { Decimal::ONE } else { Decimal::ZERO }),
        Value::Byte(n) => Some(Decimal::from(*n)),
        Value::Short(n) => Some(Decimal::from(*n)),
        Value::Integer(n) => Some(Decimal::from(*n)),
        Value::Long(n) => Some(Decimal::from(*n)),
        Value::Float(n) => Decimal::from_f32(*n),
        Value::Double(n) => Decimal::from_f64(*n),
        Value::BigInteger(n) => Decimal::from_i128(*n),
        Value::BigDecimal(d) => Some(*d),
        Value::Number(n) => n.to_decimal(),
        Value::Date(d) => Some(date_number(*d, ctx)),
        Value::DateTime(dt) => Some(date_number(dt.date(), ctx) + time_fraction(dt.time())),
        Value::Time(t) => Some(time_fraction(*t)),
        _ => None,
    };
    number.ok_or_else(|| {
        ConvertError::failed(format!(
            "Failed to convert {} ({}) to a number",
            describe(value),
            value.type_label()
        ))
    })
}

/// Convert a decimal to a numeric, boolean or temporal target
pub fn number_to(number: Decimal, target: ValueType, ctx: &ConverterContext<'_>) -> ConvertResult {
    let integral = number.fract().is_zero();
    let converted = match target {
        ValueType::Byte if integral => number.to_i8().map(Value::Byte),
        ValueType::Short if integral => number.to_i16().map(Value::Short),
        ValueType::Integer if integral => number.to_i32().map(Value::Integer),
        ValueType::Long if integral => number.to_i64().map(Value::Long),
        ValueType::BigInteger if integral => number.to_i128().map(Value::BigInteger),
        ValueType::Float => number.to_f32().map(Value::Float),
        ValueType::Double => number.to_f64().map(Value::Double),
        ValueType::BigDecimal => Some(Value::BigDecimal(number)),
        ValueType::Number => Some(Value::Number(ctx.number(number))),
        ValueType::Boolean => Some(Value::Boolean(!number.is_zero())),
        ValueType::Date => return date_from_number(number, ctx).map(Value::Date),
        ValueType::DateTime => return date_time_from_number(number, ctx).map(Value::DateTime),
        ValueType::Time => return time_from_number(number, ctx).map(Value::Time),
        _ => None,
    };
    converted.ok_or_else(|| ConvertError::failed(format!("Failed to convert {number} to {target}")))
}

/// Day count of a date, relative to the context's day zero
pub fn date_number(date: NaiveDate, ctx: &ConverterContext<'_>) -> Decimal {
    let days = date.signed_duration_since(NaiveDate::default()).num_days();
    Decimal::from(days) + Decimal::from(ctx.date_offset)
}

/// Fraction of the day elapsed at `time`
pub fn time_fraction(time: NaiveTime) -> Decimal {
    let seconds = Decimal::from(time.num_seconds_from_midnight());
    let nanos = Decimal::from(time.nanosecond().min(999_999_999));
    (seconds + nanos / Decimal::from(NANOS_PER_SECOND)) / Decimal::from(SECONDS_PER_DAY)
}

/// Date for a date number, dropping any fraction
pub fn date_from_number(number: Decimal, ctx: &ConverterContext<'_>) -> Result<NaiveDate, ConvertError> {
    number
        .trunc()
        .to_i64()
        .and_then(|days| add_days(epoch(ctx).ok()?, days))
        .ok_or_else(|| ConvertError::failed(format!("Date number {number} out of range")))
}

/// Date-time for a date number; whole days give the date, the fraction the time of day
pub fn date_time_from_number(
    number: Decimal,
    ctx: &ConverterContext<'_>,
) -> Result<NaiveDateTime, ConvertError> {
    let out_of_range = || ConvertError::failed(format!("Date number {number} out of range"));
    let days = number.floor();
    let mut seconds = seconds_of_day(number - days, ctx);
    let mut days = days.to_i64().ok_or_else(out_of_range)?;
    if seconds == SECONDS_PER_DAY {
        days += 1;
        seconds = 0;
    }
    let date = add_days(epoch(ctx)?, days).ok_or_else(out_of_range)?;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0).ok_or_else(out_of_range)?;
    Ok(date.and_time(time))
}

/// Time for a fraction of a day; fails unless `0 <= number < 1`
pub fn time_from_number(number: Decimal, ctx: &ConverterContext<'_>) -> Result<NaiveTime, ConvertError> {
    let invalid = || ConvertError::failed(format!("Invalid time {number}, expected 0 <= time < 1"));
    if (number.is_sign_negative() && !number.is_zero()) || number >= Decimal::ONE {
        return Err(invalid());
    }
    let seconds = seconds_of_day(number, ctx);
    if seconds >= SECONDS_PER_DAY {
        return Err(invalid());
    }
    NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0).ok_or_else(invalid)
}

/// Whole seconds in a fraction of a day, rounded with the context's strategy
fn seconds_of_day(fraction: Decimal, ctx: &ConverterContext<'_>) -> i64 {
    (fraction * Decimal::from(SECONDS_PER_DAY))
        .round_dp_with_strategy(0, ctx.rounding)
        .to_i64()
        .unwrap_or_default()
}

fn epoch(ctx: &ConverterContext<'_>) -> Result<NaiveDate, ConvertError> {
    ctx.epoch_date()
        .ok_or_else(|| ConvertError::failed(format!("Invalid date offset {}", ctx.date_offset)))
}
