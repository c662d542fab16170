//! End to end conversions through the composed converters

use chrono::NaiveDate;
use duke_convert::prelude::*;
use duke_convert::{ErrorThrowingConverter, ErrorToNumberConverter, PatternPair};
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// An integer becomes a float of the same value
#[test]
fn test_integer_to_float() {
    let ctx = ConverterContext::simple();
    let formula = SpreadsheetConverters::default().formula();
    assert_eq!(
        formula.convert(&Value::Integer(123), ValueType::Float, &ctx),
        Ok(Value::Float(123.0))
    );
}

/// A parse pattern with alternatives reads prefixed numbers
#[test]
fn test_parse_prefixed_number() {
    let mut settings = ConverterSettings {
        date_system: DateSystem::Unix,
        ..ConverterSettings::default()
    };
    settings.patterns.number = PatternPair::new("\"N\" #", "\"N\" #;\"N\" #.#");

    let general = GeneralConverter::from_settings(&settings).unwrap();
    let converters = SpreadsheetConverters::new(Arc::new(general));
    let ctx = ConverterContext::new(&settings);
    assert_eq!(ctx.date_offset, 0);

    assert_eq!(
        converters
            .formula()
            .convert(&Value::text("N 123"), ValueType::Number, &ctx),
        Ok(Value::Number(ExpressionNumber::Double(123.0)))
    );
}

/// Escaped literals survive formatting and parsing back
#[test]
fn test_date_pattern_round_trip() {
    let mut settings = ConverterSettings::default();
    settings.patterns.date = PatternPair::new("\\D yyyy-mm-dd", "\\D yyyy-mm-dd");
    let converters = SpreadsheetConverters::new(Arc::new(
        GeneralConverter::from_settings(&settings).unwrap(),
    ));
    let ctx = ConverterContext::new(&settings);
    let date = Value::Date(NaiveDate::from_ymd_opt(2000, 12, 31).unwrap());

    let text = converters
        .formatting()
        .convert(&date, ValueType::Text, &ctx)
        .unwrap();
    assert_eq!(text, Value::text("D 2000-12-31"));
    assert_eq!(
        converters.formula().convert(&text, ValueType::Date, &ctx),
        Ok(date)
    );
}

/// Asking for the selection supertype keeps the cell as it is
#[test]
fn test_cell_to_selection() {
    let ctx = ConverterContext::simple();
    let cell = Value::from(CellReference::parse("Z99").unwrap());
    let converted = SpreadsheetConverters::default()
        .formula()
        .convert(&cell, ValueType::Selection, &ctx)
        .unwrap();
    assert_eq!(converted, cell);
    assert_eq!(converted.value_type(), Some(ValueType::Cell));
    assert!(converted.is_assignable_to(ValueType::Selection));
}

/// A report with one failing pair marshalls to the documented JSON
#[test]
fn test_missing_converter_json() {
    let set: MissingConverterSet = [MissingConverter::new(
        "converter1",
        [MissingConverterValue::new(Value::text("Hello1"), ValueType::Text)],
    )]
    .into_iter()
    .collect();

    assert_eq!(
        serde_json::to_string(&set).unwrap(),
        r#"[{"name":"converter1","values":[{"value":"Hello1","type":"alloc::string::String"}]}]"#
    );
}

/// The same not-found error is zero under one policy and thrown under the other
#[test]
fn test_error_policy_exactness() {
    let ctx = ConverterContext::simple();
    let error = Value::Error(SpreadsheetError::selection_not_found(Selection::parse("Z99").unwrap()));

    for (target, zero) in [
        (ValueType::Byte, Value::Byte(0)),
        (ValueType::Integer, Value::Integer(0)),
        (ValueType::BigDecimal, Value::BigDecimal(Default::default())),
        (ValueType::Number, Value::Number(ExpressionNumber::Double(0.0))),
    ] {
        assert_eq!(ErrorToNumberConverter.convert(&error, target, &ctx), Ok(zero));
        match ErrorThrowingConverter.convert(&error, target, &ctx) {
            Err(ConvertError::Thrown(thrown)) => {
                assert_eq!(thrown.kind, SpreadsheetErrorKind::Name);
                assert!(thrown.is_not_found());
            }
            other => panic!("expected a thrown error, got {other:?}"),
        }
    }

    let div0 = Value::Error(SpreadsheetErrorKind::Div0.with_message("Divide by zero"));
    assert!(ErrorToNumberConverter
        .convert(&div0, ValueType::Integer, &ctx)
        .is_err());
}

/// Thrown errors stop a collection, ordinary failures let it go on
#[test]
fn test_thrown_errors_abort_collections() {
    let ctx = ConverterContext::simple();
    let error = Value::Error(SpreadsheetError::new(SpreadsheetErrorKind::Value));
    let converters = SpreadsheetConverters::default();

    assert!(matches!(
        converters.formula().convert(&error, ValueType::Text, &ctx),
        Err(ConvertError::Thrown(_))
    ));
    assert_eq!(
        converters.formatting().convert(&error, ValueType::Text, &ctx),
        Ok(Value::text("#VALUE!"))
    );
}

/// Labels resolve through the context before converting further
#[test]
fn test_labels() {
    let mut labels = duke_convert_core::LabelMappings::new();
    labels
        .define(
            duke_convert_core::LabelName::parse("Totals").unwrap(),
            Selection::parse("D5:D9").unwrap(),
        )
        .unwrap();
    let ctx = ConverterContext::simple().with_label_resolver(&labels);
    let label = Value::Selection(Selection::parse("Totals").unwrap());

    let formula = SpreadsheetConverters::default().formula();
    assert_eq!(
        formula.convert(&label, ValueType::CellRange, &ctx),
        Ok(Value::Selection(Selection::parse("D5:D9").unwrap()))
    );
    assert_eq!(
        formula.convert(&label, ValueType::Cell, &ctx),
        Ok(Value::Selection(Selection::parse("D5").unwrap()))
    );
    assert_eq!(
        formula.convert(&label, ValueType::Text, &ctx),
        Ok(Value::text("Totals"))
    );
}

/// Settings read from JSON change how numbers and dates render
#[test]
fn test_settings_from_json() {
    let settings: ConverterSettings = serde_json::from_str(
        r##"{
            "date-system": "excel1904",
            "decimal-number-symbols": {"decimal-separator": ",", "group-separator": "."},
            "patterns": {
                "boolean": {"format": "@", "parse": "@"},
                "date": {"format": "dd.mm.yyyy", "parse": "dd.mm.yyyy;d.m.yy"},
                "dateTime": {"format": "dd.mm.yyyy hh:mm", "parse": "dd.mm.yyyy hh:mm"},
                "number": {"format": "#,##0.00", "parse": "#,##0.00;General"},
                "string": {"format": "@", "parse": "@"},
                "time": {"format": "hh:mm", "parse": "hh:mm"}
            }
        }"##,
    )
    .unwrap();
    let converters =
        SpreadsheetConverters::new(Arc::new(GeneralConverter::from_settings(&settings).unwrap()));
    let ctx = ConverterContext::new(&settings);
    let formatting = converters.formatting();

    assert_eq!(
        formatting.convert(&Value::Double(0.0), ValueType::Date, &ctx),
        Ok(Value::Date(NaiveDate::from_ymd_opt(1904, 1, 1).unwrap()))
    );
    assert_eq!(
        formatting.convert(&Value::text("1.234,5"), ValueType::Double, &ctx),
        Ok(Value::Double(1234.5))
    );
    assert_eq!(
        formatting.convert(
            &Value::Date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()),
            ValueType::Text,
            &ctx
        ),
        Ok(Value::text("09.03.2024"))
    );
}
