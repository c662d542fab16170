//! Properties every conversion must keep

use chrono::{Days, NaiveDate, NaiveTime};
use duke_convert::prelude::*;
use duke_convert::{SpreadsheetFormatPattern, SpreadsheetParsePattern};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn general() -> GeneralConverter {
    GeneralConverter::default()
}

fn convert(value: &Value, target: ValueType, ctx: &ConverterContext<'_>) -> ConvertResult {
    let converter = general();
    assert!(converter.can_convert(value, target, ctx), "{value:?} to {target}");
    converter.convert(value, target, ctx)
}

#[test]
fn test_noon_is_half_a_day() {
    let ctx = ConverterContext::simple();
    let noon = Value::Time(NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    assert_eq!(
        convert(&Value::BigDecimal(Decimal::new(5, 1)), ValueType::Time, &ctx),
        Ok(noon.clone())
    );
    assert_eq!(
        convert(&noon, ValueType::BigDecimal, &ctx),
        Ok(Value::BigDecimal(Decimal::new(5, 1)))
    );
}

#[test]
fn test_fractions_rejected_by_integral_types() {
    let ctx = ConverterContext::simple();
    let value = Value::BigDecimal(Decimal::new(15, 1));
    for target in [ValueType::Byte, ValueType::Short, ValueType::Integer, ValueType::Long, ValueType::BigInteger] {
        assert!(convert(&value, target, &ctx).is_err(), "{target}");
    }
    for target in [ValueType::Float, ValueType::Double, ValueType::BigDecimal, ValueType::Number] {
        assert!(convert(&value, target, &ctx).is_ok(), "{target}");
    }
}

#[test]
fn test_whole_days_are_not_times() {
    let ctx = ConverterContext::simple();
    assert!(convert(&Value::Integer(1), ValueType::Time, &ctx).is_err());
    assert!(convert(&Value::Double(-0.25), ValueType::Time, &ctx).is_err());
}

#[test]
fn test_formula_rejects_numbers_beyond_decimal_range() {
    let ctx = ConverterContext::simple();
    let formula = SpreadsheetConverters::default().formula();
    for text in ["1E40", "1E-40", "1E2000000000"] {
        let result = formula.convert(&Value::text(text), ValueType::Number, &ctx);
        assert!(matches!(result, Err(ConvertError::Failed { .. })), "{text}: {result:?}");
    }
}

const NUMBER_PATTERNS: [&str; 7] = [
    "0%",
    "0.00",
    "#,##0",
    "0.00E+00",
    "0,",
    "General",
    "0.0%;(0.0%)",
];

proptest! {
    #[test]
    fn large_numbers_format_or_fail(
        mantissa in -79_228_162_514_264_337_593_543_950_335i128..=79_228_162_514_264_337_593_543_950_335,
        scale in 0u32..=28,
        pattern in prop::sample::select(NUMBER_PATTERNS.to_vec()),
    ) {
        let ctx = ConverterContext::simple();
        let value = Value::BigDecimal(Decimal::from_i128_with_scale(mantissa, scale));
        let format = SpreadsheetFormatPattern::number(pattern).unwrap();
        if let Err(error) = format.format(&value, &ctx) {
            prop_assert!(error.is_recoverable(), "{pattern}: {error:?}");
        }
    }

    #[test]
    fn exponents_parse_exactly_or_fail(digit in 1i128..10, exponent in -60i32..60) {
        let ctx = ConverterContext::simple();
        let parse = SpreadsheetParsePattern::number("General").unwrap();
        let text = format!("{digit}E{exponent}");

        let exact = if exponent < 0 {
            (exponent >= -28).then(|| Decimal::from_i128_with_scale(digit, exponent.unsigned_abs()))
        } else {
            10i128
                .checked_pow(exponent as u32)
                .and_then(|power| power.checked_mul(digit))
                .filter(|n| *n <= Decimal::MAX.mantissa())
                .map(|n| Decimal::from_i128_with_scale(n, 0))
        };
        let parsed = parse.parse_value(&text, ValueType::BigDecimal, &ctx);
        match exact {
            Some(exact) => prop_assert_eq!(parsed, Ok(Value::BigDecimal(exact))),
            None => prop_assert!(parsed.is_err(), "{} gave {:?}", text, parsed),
        }
    }

    #[test]
    fn epoch_for_any_offset(offset in -100_000i64..100_000) {
        let ctx = ConverterContext::simple().with_date_offset(offset);
        let epoch = ctx.epoch_date().unwrap();

        prop_assert_eq!(convert(&Value::Integer(0), ValueType::Date, &ctx), Ok(Value::Date(epoch)));
        prop_assert_eq!(
            convert(&Value::Integer(1), ValueType::Date, &ctx),
            Ok(Value::Date(epoch.checked_add_days(Days::new(1)).unwrap()))
        );
        prop_assert_eq!(convert(&Value::Date(epoch), ValueType::Integer, &ctx), Ok(Value::Integer(0)));
    }

    #[test]
    fn boolean_round_trips(b in any::<bool>()) {
        let ctx = ConverterContext::simple();
        let value = Value::Boolean(b);
        for target in [ValueType::Integer, ValueType::Number, ValueType::Date, ValueType::DateTime, ValueType::Text] {
            let there = convert(&value, target, &ctx).unwrap();
            prop_assert_eq!(convert(&there, ValueType::Boolean, &ctx), Ok(value.clone()));
        }
    }

    #[test]
    fn day_numbers_round_trip(days in -600_000i32..600_000) {
        let ctx = ConverterContext::simple();
        let value = Value::Integer(days);
        let date = convert(&value, ValueType::Date, &ctx).unwrap();
        prop_assert_eq!(convert(&date, ValueType::Integer, &ctx), Ok(value.clone()));

        let date_time = convert(&value, ValueType::DateTime, &ctx).unwrap();
        prop_assert_eq!(convert(&date_time, ValueType::Integer, &ctx), Ok(value));
    }

    #[test]
    fn seconds_of_day_round_trip(seconds in 0u32..86_400) {
        let ctx = ConverterContext::simple();
        let time = Value::Time(NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap());
        let number = convert(&time, ValueType::BigDecimal, &ctx).unwrap();
        prop_assert_eq!(convert(&number, ValueType::Time, &ctx), Ok(time));
    }

    #[test]
    fn decimals_round_trip_through_text(cents in -1_000_000_000i64..1_000_000_000) {
        let ctx = ConverterContext::simple();
        let value = Value::BigDecimal(Decimal::new(cents, 2));
        let text = convert(&value, ValueType::Text, &ctx).unwrap();
        prop_assert_eq!(convert(&text, ValueType::BigDecimal, &ctx), Ok(value));
    }

    #[test]
    fn dates_round_trip_through_text(days in 0u64..100_000) {
        let ctx = ConverterContext::simple();
        let date = NaiveDate::from_ymd_opt(1800, 1, 1).unwrap().checked_add_days(Days::new(days)).unwrap();
        let value = Value::Date(date);
        let text = convert(&value, ValueType::Text, &ctx).unwrap();
        prop_assert_eq!(convert(&text, ValueType::Date, &ctx), Ok(value));
    }

    #[test]
    fn text_is_unchanged(text in ".*") {
        let ctx = ConverterContext::simple();
        let value = Value::text(text);
        prop_assert_eq!(convert(&value, ValueType::Text, &ctx), Ok(value));
    }

    #[test]
    fn selections_are_unchanged(column in 0u16..16_384, row in 0u32..1_048_576) {
        let ctx = ConverterContext::simple();
        let converter = SelectionConverter::default();
        let cell = Value::from(CellReference::new(column, row).unwrap());
        for target in [ValueType::Cell, ValueType::CellOrCellRange, ValueType::Selection] {
            prop_assert_eq!(converter.convert(&cell, target, &ctx), Ok(cell.clone()));
        }
        let range = converter.convert(&cell, ValueType::CellRange, &ctx).unwrap();
        prop_assert_eq!(converter.convert(&range, ValueType::Cell, &ctx), Ok(cell));
    }
}

