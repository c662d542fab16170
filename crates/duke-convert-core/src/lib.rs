//! # duke-convert-core
//!
//! Runtime value model for the duke-convert conversion engine.
//!
//! This crate provides the values every conversion consumes or produces:
//! - [`Value`] and [`ValueType`] - a runtime value and the type tag naming a conversion target
//! - [`ExpressionNumber`] - the formula number, in double or exact decimal representation
//! - [`Selection`] - cells, ranges, columns, rows and labels
//! - [`SpreadsheetError`] - error values such as `#DIV/0!`
//!
//! ## Example
//!
//! ```rust
//! use duke_convert_core::{CellReference, Selection, Value, ValueType};
//!
//! let cell = CellReference::parse("Z99").unwrap();
//! let value = Value::from(cell);
//!
//! assert_eq!(value.value_type(), Some(ValueType::Cell));
//! assert!(value.is_assignable_to(ValueType::Selection));
//! assert_eq!(Selection::parse("Z99").unwrap(), Selection::Cell(cell));
//! ```

pub mod error;
mod json;
pub mod number;
pub mod selection;
pub mod spreadsheet_error;
pub mod value;

// Re-exports for convenience
pub use error::{Error, Result};
pub use number::{ExpressionNumber, ExpressionNumberKind};
pub use selection::{
    CellRange, CellReference, ColumnRange, ColumnReference, LabelMappings, LabelName,
    LabelResolver, RowRange, RowReference, Selection,
};
pub use spreadsheet_error::{SpreadsheetError, SpreadsheetErrorKind};
pub use value::{Value, ValueType};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
