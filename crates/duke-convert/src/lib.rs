//! # duke-convert
//!
//! Type-directed value conversion for spreadsheet formulas, formatting, sorting and
//! validation.
//!
//! A [`Converter`] turns a [`Value`] into a requested [`ValueType`] under a
//! [`ConverterContext`] holding the date system, number symbols, rounding and label
//! resolver. Converters compose:
//!
//! - [`GeneralConverter`] - booleans, numbers, dates, times and text, using patterns
//! - [`SelectionConverter`] - cells, ranges, columns, rows and labels
//! - [`ErrorThrowingConverter`], [`ErrorToNumberConverter`], [`ErrorToTextConverter`] -
//!   what happens to error values
//! - [`ConverterCollection`] - the first of several converters that succeeds
//! - [`SpreadsheetConverters`] - the collection each [`ConverterUsage`] needs
//!
//! [`MissingConverterVerifier`] reports the conversions a converter is missing for
//! a usage.
//!
//! ## Example
//!
//! ```rust
//! use duke_convert::prelude::*;
//!
//! let converters = SpreadsheetConverters::default();
//! let formula = converters.formula();
//! let ctx = ConverterContext::simple();
//!
//! assert_eq!(
//!     formula.convert(&Value::Integer(123), ValueType::Float, &ctx),
//!     Ok(Value::Float(123.0))
//! );
//! assert_eq!(
//!     formula.convert(&Value::Double(1.0), ValueType::Date, &ctx),
//!     Ok(Value::from(chrono::NaiveDate::from_ymd_opt(1899, 12, 31).unwrap()))
//! );
//!
//! let report = MissingConverterVerifier::verify(&formula, ConverterUsage::Formula, &ctx);
//! assert!(report.is_empty());
//! ```

pub mod bridge;
pub mod category;
pub mod context;
pub mod converter;
pub mod error;
pub mod general;
pub mod missing;
pub mod pattern;
pub mod prelude;
pub mod selection;
pub mod spreadsheet_error;
pub mod usage;

pub use bridge::BridgeConverter;
pub use category::{CategoryMapping, ValueCategory};
pub use context::{
    ConverterContext, ConverterSettings, DateSystem, DateTimeSymbols, DecimalNumberSymbols,
    RoundingMode, EXCEL_1900_OFFSET, EXCEL_1904_OFFSET,
};
pub use converter::{
    ChainConverter, Converter, ConverterCollection, ShortCircuitConverter, SimpleConverter,
};
pub use error::{ConvertError, ConvertResult, PatternError, PatternResult, UnknownUsage};
pub use general::{CharNarrowing, GeneralConverter, PatternPair};
pub use missing::{
    MissingConverter, MissingConverterSet, MissingConverterValue, MissingConverterVerifier,
};
pub use pattern::{
    FormatPatternConverter, ParsePatternConverter, SpreadsheetFormatPattern,
    SpreadsheetParsePattern, SpreadsheetPatternKind,
};
pub use selection::{RangeNarrowing, SelectionConverter};
pub use spreadsheet_error::{ErrorThrowingConverter, ErrorToNumberConverter, ErrorToTextConverter};
pub use usage::{ConverterUsage, SpreadsheetConverters};
