//! Ready made converters for each place a spreadsheet converts values

use crate::converter::{Converter, ConverterCollection};
use crate::error::UnknownUsage;
use crate::general::GeneralConverter;
use crate::selection::{RangeNarrowing, SelectionConverter};
use crate::spreadsheet_error::{ErrorThrowingConverter, ErrorToNumberConverter, ErrorToTextConverter};
use duke_convert_core::ValueType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Where a conversion happens, which decides the targets that must be supported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConverterUsage {
    /// Function arguments and results during formula evaluation
    Formula,
    /// Rendering cell values as text
    Formatting,
    /// Comparing cell values of mixed types
    Sort,
    /// Checking a value against a validation rule
    Validation,
}

impl ConverterUsage {
    pub const ALL: [ConverterUsage; 4] = [
        ConverterUsage::Formula,
        ConverterUsage::Formatting,
        ConverterUsage::Sort,
        ConverterUsage::Validation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConverterUsage::Formula => "formula",
            ConverterUsage::Formatting => "formatting",
            ConverterUsage::Sort => "sort",
            ConverterUsage::Validation => "validation",
        }
    }

    /// Targets a converter for this usage must reach from a value of `source`
    pub fn required_targets(&self, source: ValueType) -> Vec<ValueType> {
        use ValueType as T;

        match self {
            ConverterUsage::Formatting => vec![T::Text],
            ConverterUsage::Formula => match source {
                T::Error => vec![],
                T::Boolean => vec![T::Boolean, T::Number, T::Text],
                T::Text | T::Char => vec![T::Number, T::Text],
                T::Date => vec![T::Date, T::DateTime, T::Number, T::Text],
                T::DateTime => vec![T::Date, T::DateTime, T::Number, T::Text, T::Time],
                T::Time => vec![T::Time, T::DateTime, T::Number, T::Text],
                T::Cell | T::CellRange => vec![
                    T::Cell,
                    T::CellRange,
                    T::CellOrCellRange,
                    T::Selection,
                    T::Text,
                ],
                _ if source.is_selection() => vec![T::Selection, T::Text],
                _ => vec![T::Boolean, T::Number, T::Text, T::Date, T::DateTime],
            },
            ConverterUsage::Sort => match source {
                T::Text | T::Char => vec![T::Text],
                _ if source.is_selection() => vec![T::Text],
                _ => vec![T::Number, T::Text],
            },
            ConverterUsage::Validation => match source {
                T::Error | T::Text | T::Char => vec![T::Text],
                T::Boolean => vec![T::Boolean, T::Text],
                T::Date | T::DateTime | T::Time => vec![source, T::Text],
                _ if source.is_selection() => vec![T::Selection, T::Text],
                _ => vec![T::Number, T::Text],
            },
        }
    }
}

impl fmt::Display for ConverterUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConverterUsage {
    type Err = UnknownUsage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|usage| usage.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownUsage(s.to_string()))
    }
}

/// Builds the converter each usage needs around one shared general converter
///
/// | usage      | converters, in order                                   |
/// |------------|--------------------------------------------------------|
/// | formula    | error throwing, selection (top-left), general          |
/// | formatting | error to text, selection, general                      |
/// | sort       | error to number, error to text, selection, general     |
/// | validation | error to text, selection, general                      |
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetConverters {
    general: Arc<GeneralConverter>,
}

impl SpreadsheetConverters {
    pub fn new(general: Arc<GeneralConverter>) -> Self {
        Self { general }
    }

    pub fn general(&self) -> &Arc<GeneralConverter> {
        &self.general
    }

    pub fn for_usage(&self, usage: ConverterUsage) -> ConverterCollection {
        let general: Arc<dyn Converter> = self.general.clone();
        let selection: Arc<dyn Converter> = Arc::new(SelectionConverter::new(match usage {
            ConverterUsage::Formula => RangeNarrowing::TopLeft,
            _ => RangeNarrowing::Strict,
        }));
        let to_text: Arc<dyn Converter> = Arc::new(ErrorToTextConverter);

        let converters = match usage {
            ConverterUsage::Formula => vec![
                Arc::new(ErrorThrowingConverter) as Arc<dyn Converter>,
                selection,
                general,
            ],
            ConverterUsage::Formatting | ConverterUsage::Validation => {
                vec![to_text, selection, general]
            }
            ConverterUsage::Sort => vec![
                Arc::new(ErrorToNumberConverter) as Arc<dyn Converter>,
                to_text,
                selection,
                general,
            ],
        };
        ConverterCollection::new(converters)
    }

    pub fn formula(&self) -> ConverterCollection {
        self.for_usage(ConverterUsage::Formula)
    }

    pub fn formatting(&self) -> ConverterCollection {
        self.for_usage(ConverterUsage::Formatting)
    }

    pub fn sort(&self) -> ConverterCollection {
        self.for_usage(ConverterUsage::Sort)
    }

    pub fn validation(&self) -> ConverterCollection {
        self.for_usage(ConverterUsage::Validation)
    }
}
