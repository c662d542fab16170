//! Conversions between selections, and between selections and text

use crate::context::ConverterContext;
use crate::converter::Converter;
use crate::error::{ConvertError, ConvertResult};
use duke_convert_core::{
    CellRange, CellReference, ColumnRange, ColumnReference, LabelName, RowRange, RowReference,
    Selection, Value, ValueType,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happens when a range with several elements is asked for as a single cell, column or row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeNarrowing {
    /// Only ranges of exactly one element narrow
    #[default]
    Strict,
    /// Any range narrows to its top-left element
    TopLeft,
}

/// Converts between cells, columns, rows, their ranges, labels and text
///
/// - a single element widens to a one element range, and a range narrows per [`RangeNarrowing`]
/// - text parses strictly into the requested selection type
/// - a label resolves through the context before converting further
/// - a char is shorthand for a column (`'A'`) or a row (`'1'`..`'9'`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionConverter {
    narrowing: RangeNarrowing,
}

impl SelectionConverter {
    pub fn new(narrowing: RangeNarrowing) -> Self {
        Self { narrowing }
    }

    pub fn narrowing(&self) -> RangeNarrowing {
        self.narrowing
    }

    fn convert_selection(
        &self,
        selection: &Selection,
        target: ValueType,
        ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        if target.is_assignable_from(ValueType::of_selection(selection)) {
            return Ok(Value::Selection(selection.clone()));
        }

        let converted: Selection = match (selection, target) {
            (_, ValueType::Text) => return Ok(Value::Text(selection.to_string())),
            (Selection::Label(label), _) => {
                let resolved = ctx.resolve_label(label)?;
                if let Selection::Label(other) = &resolved {
                    return Err(ConvertError::failed(format!(
                        "Label {label} refers to another label {other}"
                    )));
                }
                return self.convert_selection(&resolved, target, ctx);
            }
            (Selection::Cell(cell), ValueType::CellRange) => CellRange::single(*cell).into(),
            (Selection::CellRange(range), ValueType::Cell) => {
                Selection::Cell(self.narrow(range.to_cell(), range.begin, selection)?)
            }
            (Selection::Column(column), ValueType::ColumnRange) => {
                Selection::ColumnRange(ColumnRange::single(*column))
            }
            (Selection::ColumnRange(range), ValueType::Column) => {
                Selection::Column(self.narrow(range.to_column(), range.begin, selection)?)
            }
            (Selection::Row(row), ValueType::RowRange) => Selection::RowRange(RowRange::single(*row)),
            (Selection::RowRange(range), ValueType::Row) => {
                Selection::Row(self.narrow(range.to_row(), range.begin, selection)?)
            }
            _ => return Err(ConvertError::unsupported(&selection.clone().into(), target)),
        };
        Ok(Value::Selection(converted))
    }

    fn narrow<T>(&self, single: Option<T>, first: T, range: &Selection) -> Result<T, ConvertError> {
        match (single, self.narrowing) {
            (Some(one), _) => Ok(one),
            (None, RangeNarrowing::TopLeft) => Ok(first),
            (None, RangeNarrowing::Strict) => Err(ConvertError::failed(format!(
                "{range} is not a single {}",
                element_name(range)
            ))),
        }
    }
}

fn element_name(range: &Selection) -> &'static str {
    match range {
        Selection::ColumnRange(_) => "column",
        Selection::RowRange(_) => "row",
        _ => "cell",
    }
}

/// Whether a selection of type `source` can become `target` without parsing
fn is_selection_pair(source: ValueType, target: ValueType) -> bool {
    target.is_assignable_from(source)
        || (source == ValueType::Label && target.is_selection())
        || matches!(
            (source, target),
            (ValueType::Cell, ValueType::CellRange)
                | (ValueType::CellRange, ValueType::Cell)
                | (ValueType::Column, ValueType::ColumnRange)
                | (ValueType::ColumnRange, ValueType::Column)
                | (ValueType::Row, ValueType::RowRange)
                | (ValueType::RowRange, ValueType::Row)
        )
}

/// Parse text strictly as one selection type
fn parse_selection(text: &str, target: ValueType) -> ConvertResult {
    let selection: Selection = match target {
        ValueType::Cell => CellReference::parse(text)?.into(),
        ValueType::CellRange => CellRange::parse(text)?.into(),
        ValueType::Column => Selection::Column(ColumnReference::parse(text)?),
        ValueType::ColumnRange => Selection::ColumnRange(ColumnRange::parse(text)?),
        ValueType::Row => Selection::Row(RowReference::parse(text)?),
        ValueType::RowRange => Selection::RowRange(RowRange::parse(text)?),
        ValueType::Label => LabelName::parse(text)?.into(),
        ValueType::CellOrCellRange => {
            if text.contains(':') {
                CellRange::parse(text)?.into()
            } else {
                CellReference::parse(text)?.into()
            }
        }
        ValueType::Selection => Selection::parse(text)?,
        _ => return Err(ConvertError::unsupported(&Value::text(text), target)),
    };
    Ok(Value::Selection(selection))
}

/// Single character shorthand for a column or row
fn char_selection(c: char, target: ValueType) -> Option<Selection> {
    match target {
        ValueType::Column => ColumnReference::from_char(c).map(Selection::Column),
        ValueType::Row => RowReference::from_char(c).map(Selection::Row),
        ValueType::Selection => ColumnReference::from_char(c)
            .map(Selection::Column)
            .or_else(|| RowReference::from_char(c).map(Selection::Row)),
        _ => None,
    }
}

impl Converter for SelectionConverter {
    fn can_convert(&self, value: &Value, target: ValueType, _ctx: &ConverterContext<'_>) -> bool {
        match value {
            Value::Selection(selection) => {
                target == ValueType::Text
                    || is_selection_pair(ValueType::of_selection(selection), target)
            }
            Value::Text(_) => target.is_selection(),
            Value::Char(c) => char_selection(*c, target).is_some(),
            _ => false,
        }
    }

    fn convert(
        &self,
        value: &Value,
        target: ValueType,
        ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        match value {
            Value::Selection(selection) => self.convert_selection(selection, target, ctx),
            Value::Text(text) => parse_selection(text, target),
            Value::Char(c) => char_selection(*c, target)
                .map(Value::Selection)
                .ok_or_else(|| ConvertError::unsupported(value, target)),
            _ => Err(ConvertError::unsupported(value, target)),
        }
    }
}

impl fmt::Display for SelectionConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.narrowing {
            RangeNarrowing::Strict => f.write_str("Selection"),
            RangeNarrowing::TopLeft => f.write_str("Selection(top-left)"),
        }
    }
}
