//! Prelude module - common imports for duke-convert users
//!
//! ```rust
//! use duke_convert::prelude::*;
//! ```

pub use crate::{
    ConvertError, ConvertResult, Converter, ConverterCollection, ConverterContext,
    ConverterSettings, ConverterUsage, DateSystem, GeneralConverter, MissingConverter,
    MissingConverterSet, MissingConverterValue, MissingConverterVerifier, RangeNarrowing,
    SelectionConverter, SpreadsheetConverters, EXCEL_1900_OFFSET, EXCEL_1904_OFFSET,
};
pub use duke_convert_core::{
    CellRange, CellReference, ExpressionNumber, ExpressionNumberKind, Selection,
    SpreadsheetError, SpreadsheetErrorKind, Value, ValueType,
};
