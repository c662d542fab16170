//! The converter contract and the combinators built on it

use crate::context::ConverterContext;
use crate::error::{ConvertError, ConvertResult};
use crate::missing::MissingConverterVerifier;
use duke_convert_core::{Value, ValueType};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Converts values to a requested [`ValueType`]
///
/// Converters hold no mutable state and are shared freely between threads.
/// `convert` is only called after `can_convert` returned true for the same
/// arguments; the combinators in this module enforce that.
pub trait Converter: fmt::Display + Send + Sync {
    /// Whether this converter handles the value/target pair; never has side effects
    fn can_convert(&self, value: &Value, target: ValueType, ctx: &ConverterContext<'_>) -> bool;

    /// Convert the value, returning a value assignable to `target`
    fn convert(&self, value: &Value, target: ValueType, ctx: &ConverterContext<'_>)
        -> ConvertResult;

    /// Check `can_convert` first, failing instead of calling `convert` when it is false
    fn try_convert(
        &self,
        value: &Value,
        target: ValueType,
        ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        if self.can_convert(value, target, ctx) {
            self.convert(value, target, ctx)
        } else {
            Err(ConvertError::unsupported(value, target))
        }
    }
}

impl<C: Converter + ?Sized> Converter for Arc<C> {
    fn can_convert(&self, value: &Value, target: ValueType, ctx: &ConverterContext<'_>) -> bool {
        (**self).can_convert(value, target, ctx)
    }

    fn convert(
        &self,
        value: &Value,
        target: ValueType,
        ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        (**self).convert(value, target, ctx)
    }
}

/// Passes values through when they are already assignable to the target
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleConverter;

impl Converter for SimpleConverter {
    fn can_convert(&self, value: &Value, target: ValueType, _ctx: &ConverterContext<'_>) -> bool {
        value.is_assignable_to(target)
    }

    fn convert(
        &self,
        value: &Value,
        target: ValueType,
        _ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        if value.is_assignable_to(target) {
            Ok(value.clone())
        } else {
            Err(ConvertError::unsupported(value, target))
        }
    }
}

impl fmt::Display for SimpleConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Simple")
    }
}

/// Never calls the wrapped `convert` unless its `can_convert` agrees
pub struct ShortCircuitConverter {
    inner: Arc<dyn Converter>,
}

impl ShortCircuitConverter {
    pub fn new(inner: Arc<dyn Converter>) -> Self {
        Self { inner }
    }
}

impl Converter for ShortCircuitConverter {
    fn can_convert(&self, value: &Value, target: ValueType, ctx: &ConverterContext<'_>) -> bool {
        self.inner.can_convert(value, target, ctx)
    }

    fn convert(
        &self,
        value: &Value,
        target: ValueType,
        ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        self.inner.try_convert(value, target, ctx)
    }
}

impl fmt::Display for ShortCircuitConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

/// Tries converters in the order given until one succeeds
///
/// Only converters whose `can_convert` accepts the pair are tried. A
/// [`ConvertError::Thrown`] from any of them ends the search at once; otherwise
/// the last failure is returned.
pub struct ConverterCollection {
    converters: Vec<Arc<dyn Converter>>,
}

impl ConverterCollection {
    pub fn new(converters: Vec<Arc<dyn Converter>>) -> Self {
        Self { converters }
    }

    /// Copy of this collection with another converter tried last
    pub fn with(&self, converter: Arc<dyn Converter>) -> Self {
        let mut converters = self.converters.clone();
        converters.push(converter);
        Self { converters }
    }

    pub fn converters(&self) -> &[Arc<dyn Converter>] {
        &self.converters
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl Converter for ConverterCollection {
    fn can_convert(&self, value: &Value, target: ValueType, ctx: &ConverterContext<'_>) -> bool {
        self.converters
            .iter()
            .any(|c| c.can_convert(value, target, ctx))
    }

    fn convert(
        &self,
        value: &Value,
        target: ValueType,
        ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        let mut last_failure = None;

        for converter in &self.converters {
            if !converter.can_convert(value, target, ctx) {
                continue;
            }
            trace!(converter = %converter, %target, "trying converter");
            match converter.convert(value, target, ctx) {
                Ok(converted) => return Ok(converted),
                Err(e) if e.is_recoverable() => last_failure = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_failure.unwrap_or_else(|| ConvertError::unsupported(value, target)))
    }
}

impl fmt::Display for ConverterCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, converter) in self.converters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{converter}")?;
        }
        Ok(())
    }
}

/// Converts to an intermediate type with one converter, then on to the target with another
pub struct ChainConverter {
    first: Arc<dyn Converter>,
    intermediate: ValueType,
    last: Arc<dyn Converter>,
}

impl ChainConverter {
    pub fn new(first: Arc<dyn Converter>, intermediate: ValueType, last: Arc<dyn Converter>) -> Self {
        Self {
            first,
            intermediate,
            last,
        }
    }
}

impl Converter for ChainConverter {
    /// The first step must accept `value`; the last step is checked against a sample of the
    /// intermediate type, as the real intermediate value only exists after converting
    fn can_convert(&self, value: &Value, target: ValueType, ctx: &ConverterContext<'_>) -> bool {
        self.first.can_convert(value, self.intermediate, ctx)
            && MissingConverterVerifier::sample(self.intermediate, ctx)
                .map_or(true, |sample| self.last.can_convert(&sample, target, ctx))
    }

    fn convert(
        &self,
        value: &Value,
        target: ValueType,
        ctx: &ConverterContext<'_>,
    ) -> ConvertResult {
        let intermediate = self.first.try_convert(value, self.intermediate, ctx)?;
        self.last.try_convert(&intermediate, target, ctx)
    }
}

impl fmt::Display for ChainConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}->{}", self.first, self.intermediate, self.last)
    }
}
