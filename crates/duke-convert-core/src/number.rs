//! Expression numbers
//!
//! Formulas compute with a single numeric type whose representation is chosen per
//! spreadsheet: either binary floating point or exact decimal.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which representation expression numbers use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpressionNumberKind {
    /// 64-bit binary floating point
    #[default]
    Double,
    /// Exact decimal
    BigDecimal,
}

impl ExpressionNumberKind {
    /// Zero in this representation
    pub fn zero(self) -> ExpressionNumber {
        match self {
            ExpressionNumberKind::Double => ExpressionNumber::Double(0.0),
            ExpressionNumberKind::BigDecimal => ExpressionNumber::BigDecimal(Decimal::ZERO),
        }
    }

    /// One in this representation
    pub fn one(self) -> ExpressionNumber {
        match self {
            ExpressionNumberKind::Double => ExpressionNumber::Double(1.0),
            ExpressionNumberKind::BigDecimal => ExpressionNumber::BigDecimal(Decimal::ONE),
        }
    }

    /// Build a number of this kind from an exact decimal
    ///
    /// Converting to `Double` may lose precision; it never fails for values a decimal can hold.
    pub fn from_decimal(self, value: Decimal) -> ExpressionNumber {
        match self {
            ExpressionNumberKind::Double => {
                ExpressionNumber::Double(value.to_f64().unwrap_or(f64::NAN))
            }
            ExpressionNumberKind::BigDecimal => ExpressionNumber::BigDecimal(value),
        }
    }

    /// Build a number of this kind from a float; `None` for NaN, infinities or values out
    /// of decimal range
    pub fn from_f64(self, value: f64) -> Option<ExpressionNumber> {
        if !value.is_finite() {
            return None;
        }
        match self {
            ExpressionNumberKind::Double => Some(ExpressionNumber::Double(value)),
            ExpressionNumberKind::BigDecimal => {
                Decimal::from_f64(value).map(ExpressionNumber::BigDecimal)
            }
        }
    }
}

/// A number produced or consumed by formula evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpressionNumber {
    Double(f64),
    BigDecimal(Decimal),
}

impl ExpressionNumber {
    /// The representation of this number
    pub fn kind(&self) -> ExpressionNumberKind {
        match self {
            ExpressionNumber::Double(_) => ExpressionNumberKind::Double,
            ExpressionNumber::BigDecimal(_) => ExpressionNumberKind::BigDecimal,
        }
    }

    /// Exact decimal value; `None` for non-finite doubles or doubles out of decimal range
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            ExpressionNumber::Double(d) if d.is_finite() => Decimal::from_f64(*d),
            ExpressionNumber::Double(_) => None,
            ExpressionNumber::BigDecimal(d) => Some(*d),
        }
    }

    /// Value as a float
    pub fn to_f64(&self) -> f64 {
        match self {
            ExpressionNumber::Double(d) => *d,
            ExpressionNumber::BigDecimal(d) => d.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// Re-express this number in another representation
    pub fn with_kind(self, kind: ExpressionNumberKind) -> Option<ExpressionNumber> {
        match (self, kind) {
            (ExpressionNumber::Double(d), k) => k.from_f64(d),
            (ExpressionNumber::BigDecimal(d), k) => Some(k.from_decimal(d)),
        }
    }

    /// Whether the value is zero
    pub fn is_zero(&self) -> bool {
        match self {
            ExpressionNumber::Double(d) => *d == 0.0,
            ExpressionNumber::BigDecimal(d) => d.is_zero(),
        }
    }

    /// Whether the value has no fractional part
    pub fn is_integral(&self) -> bool {
        match self {
            ExpressionNumber::Double(d) => d.is_finite() && d.fract() == 0.0,
            ExpressionNumber::BigDecimal(d) => d.fract().is_zero(),
        }
    }
}

impl fmt::Display for ExpressionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionNumber::Double(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            ExpressionNumber::BigDecimal(d) => write!(f, "{}", d.normalize()),
        }
    }
}

impl From<f64> for ExpressionNumber {
    fn from(value: f64) -> Self {
        ExpressionNumber::Double(value)
    }
}

impl From<Decimal> for ExpressionNumber {
    fn from(value: Decimal) -> Self {
        ExpressionNumber::BigDecimal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kind_zero_one() {
        assert!(ExpressionNumberKind::Double.zero().is_zero());
        assert_eq!(
            ExpressionNumberKind::BigDecimal.one(),
            ExpressionNumber::BigDecimal(Decimal::ONE)
        );
    }

    #[test]
    fn test_with_kind() {
        let n = ExpressionNumber::Double(0.5);
        assert_eq!(
            n.with_kind(ExpressionNumberKind::BigDecimal),
            Some(ExpressionNumber::BigDecimal(Decimal::from_str("0.5").unwrap()))
        );
        assert_eq!(ExpressionNumber::Double(f64::NAN).with_kind(ExpressionNumberKind::BigDecimal), None);
    }

    #[test]
    fn test_integral() {
        assert!(ExpressionNumber::Double(3.0).is_integral());
        assert!(!ExpressionNumber::Double(3.25).is_integral());
        assert!(ExpressionNumber::BigDecimal(Decimal::from_str("4.000").unwrap()).is_integral());
    }

    #[test]
    fn test_display() {
        assert_eq!(ExpressionNumber::Double(42.0).to_string(), "42");
        assert_eq!(ExpressionNumber::Double(1.5).to_string(), "1.5");
        assert_eq!(
            ExpressionNumber::BigDecimal(Decimal::from_str("1.2500").unwrap()).to_string(),
            "1.25"
        );
    }
}
