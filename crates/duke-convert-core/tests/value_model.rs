//! Parsing, display and JSON of the value model

use duke_convert_core::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Every renderable error kind parses back from its token
#[test]
fn test_error_tokens() {
    for kind in SpreadsheetErrorKind::ALL {
        let parsed = SpreadsheetErrorKind::parse(kind.as_str()).unwrap();
        assert_eq!(parsed.as_str(), kind.as_str());
    }
    assert_eq!(SpreadsheetErrorKind::parse("#div/0!").unwrap(), SpreadsheetErrorKind::Div0);
    assert!(SpreadsheetErrorKind::parse("#OOPS").is_err());
}

/// Type names and labels both identify a value type
#[test]
fn test_value_type_names() {
    for value_type in ValueType::ALL {
        assert_eq!(ValueType::parse(value_type.type_name()).unwrap(), value_type);
        assert_eq!(value_type.label().parse::<ValueType>().unwrap(), value_type);
    }
    assert_eq!(ValueType::parse("string").unwrap(), ValueType::Text);
}

/// A selection value is stored as its text
#[test]
fn test_selection_json() {
    let range = Value::from(CellRange::parse("B2:C3").unwrap());
    let json = range.to_json();
    assert_eq!(json, serde_json::json!("B2:C3"));
    assert_eq!(Value::from_json(&json, ValueType::CellRange).unwrap(), range);
    assert_eq!(Value::from_json(&serde_json::Value::Null, ValueType::Cell).unwrap(), Value::Empty);
}

/// A label resolves only once defined
#[test]
fn test_label_mappings() {
    let mut labels = LabelMappings::new();
    let totals = LabelName::parse("Totals").unwrap();
    assert_eq!(labels.resolve_label(&totals), None);

    labels.define(totals.clone(), Selection::parse("D5:D9").unwrap()).unwrap();
    assert_eq!(labels.resolve_label(&totals), Some(Selection::parse("D5:D9").unwrap()));
    assert!(labels.define(totals, Selection::parse("A1").unwrap()).is_err());
}

proptest! {
    #[test]
    fn cells_parse_their_display(column in 0u16..MAX_COLS, row in 0u32..MAX_ROWS) {
        let cell = CellReference::new(column, row).unwrap();
        prop_assert_eq!(CellReference::parse(&cell.to_string()).unwrap(), cell);
        prop_assert_eq!(Selection::parse(&cell.to_string()).unwrap(), Selection::Cell(cell));
    }

    #[test]
    fn ranges_parse_their_display(
        a in (0u16..MAX_COLS, 0u32..MAX_ROWS),
        b in (0u16..MAX_COLS, 0u32..MAX_ROWS),
    ) {
        let range = CellRange::new(
            CellReference::new(a.0, a.1).unwrap(),
            CellReference::new(b.0, b.1).unwrap(),
        );
        prop_assume!(range.begin != range.end);
        prop_assert_eq!(Selection::parse(&range.to_string()).unwrap(), Selection::CellRange(range));
    }
}
