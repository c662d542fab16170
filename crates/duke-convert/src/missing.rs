//! Reports of value/target pairs a converter cannot handle
//!
//! [`MissingConverterVerifier`] probes a converter with one sample per value type
//! and collects every failure. An empty [`MissingConverterSet`] means the converter
//! covers the usage it was checked for.

use crate::context::ConverterContext;
use crate::converter::Converter;
use crate::usage::ConverterUsage;
use chrono::NaiveDate;
use duke_convert_core::{
    CellRange, CellReference, ColumnRange, ColumnReference, LabelName, RowRange, RowReference,
    Selection, SpreadsheetError, Value, ValueType,
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// A sample value and the type it could not be converted to
#[derive(Debug, Clone)]
pub struct MissingConverterValue {
    pub value: Value,
    pub value_type: ValueType,
}

impl MissingConverterValue {
    pub fn new(value: Value, value_type: ValueType) -> Self {
        Self { value, value_type }
    }

    fn sort_key(&self) -> (String, &'static str, ValueType) {
        (self.value.to_string(), self.value.type_label(), self.value_type)
    }
}

impl PartialEq for MissingConverterValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MissingConverterValue {}

impl PartialOrd for MissingConverterValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MissingConverterValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// JSON form: `{"value": <json>, "type": "<type name>"}`
#[derive(Serialize, Deserialize)]
struct ValueJson {
    value: serde_json::Value,
    #[serde(rename = "type")]
    value_type: ValueType,
}

impl Serialize for MissingConverterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ValueJson {
            value: self.value.to_json(),
            value_type: self.value_type,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MissingConverterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = ValueJson::deserialize(deserializer)?;
        let value = Value::from_json(&json.value, natural_type(&json.value)).map_err(D::Error::custom)?;
        Ok(Self::new(value, json.value_type))
    }
}

/// The type a sample is read back as; `type` names the target, not the sample
fn natural_type(json: &serde_json::Value) -> ValueType {
    match json {
        serde_json::Value::Bool(_) => ValueType::Boolean,
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) if i32::try_from(i).is_ok() => ValueType::Integer,
            Some(_) => ValueType::Long,
            None => ValueType::Double,
        },
        serde_json::Value::Object(_) => ValueType::Error,
        _ => ValueType::Text,
    }
}

/// Failures found for one converter name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MissingConverter {
    pub name: String,
    pub values: BTreeSet<MissingConverterValue>,
}

impl MissingConverter {
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = MissingConverterValue>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().collect(),
        }
    }
}

static EMPTY: Lazy<MissingConverterSet> = Lazy::new(|| MissingConverterSet(Arc::new(BTreeSet::new())));

/// Sorted, immutable set of [`MissingConverter`]s
///
/// Every empty set is the same shared instance, see [`ptr_eq`](Self::ptr_eq).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingConverterSet(Arc<BTreeSet<MissingConverter>>);

impl MissingConverterSet {
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    fn from_set(set: BTreeSet<MissingConverter>) -> Self {
        if set.is_empty() {
            Self::empty()
        } else {
            Self(Arc::new(set))
        }
    }

    /// Copy with `converter` added; values of an entry with the same name are merged into it
    pub fn with(&self, converter: MissingConverter) -> Self {
        let mut set = (*self.0).clone();
        insert_merged(&mut set, converter);
        Self::from_set(set)
    }

    /// Copy without `converter`; removing the last one gives the empty instance
    pub fn delete(&self, converter: &MissingConverter) -> Self {
        if !self.0.contains(converter) {
            return self.clone();
        }
        let mut set = (*self.0).clone();
        set.remove(converter);
        Self::from_set(set)
    }

    /// Union of both sets
    pub fn concat(&self, other: &MissingConverterSet) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        self.iter().chain(other.iter()).cloned().collect()
    }

    /// Union of all the given sets
    pub fn merge(sets: impl IntoIterator<Item = MissingConverterSet>) -> Self {
        sets.into_iter()
            .fold(Self::empty(), |merged, set| merged.concat(&set))
    }

    /// Whether both are the same instance, not merely equal
    pub fn ptr_eq(&self, other: &MissingConverterSet) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn contains(&self, converter: &MissingConverter) -> bool {
        self.0.contains(converter)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MissingConverter> {
        self.0.iter()
    }

    /// Number of failing value/target pairs across all converters
    pub fn value_count(&self) -> usize {
        self.iter().map(|c| c.values.len()).sum()
    }
}

/// Insert keyed by name
fn insert_merged(set: &mut BTreeSet<MissingConverter>, converter: MissingConverter) {
    let existing = set.iter().find(|c| c.name == converter.name).cloned();
    let merged = match existing {
        Some(mut existing) => {
            set.remove(&existing);
            existing.values.extend(converter.values);
            existing
        }
        None => converter,
    };
    set.insert(merged);
}

impl Default for MissingConverterSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<MissingConverter> for MissingConverterSet {
    fn from_iter<I: IntoIterator<Item = MissingConverter>>(iter: I) -> Self {
        let mut set = BTreeSet::new();
        for converter in iter {
            insert_merged(&mut set, converter);
        }
        Self::from_set(set)
    }
}

impl<'a> IntoIterator for &'a MissingConverterSet {
    type Item = &'a MissingConverter;
    type IntoIter = std::collections::btree_set::Iter<'a, MissingConverter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for MissingConverterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for MissingConverterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<MissingConverter>::deserialize(deserializer).map(|converters| converters.into_iter().collect())
    }
}

/// Probes a converter for the conversions a usage needs
pub struct MissingConverterVerifier;

impl MissingConverterVerifier {
    /// Representative value of a type; `None` for the union types, which have no values of their own
    pub fn sample(value_type: ValueType, ctx: &ConverterContext<'_>) -> Option<Value> {
        let one_and_a_half = Decimal::new(15, 1);
        let new_years_eve = NaiveDate::from_ymd_opt(1999, 12, 31)?;
        let noon = chrono::NaiveTime::from_hms_opt(12, 0, 0)?;
        let cell = |text| CellReference::parse(text).ok();

        Some(match value_type {
            ValueType::Boolean => Value::Boolean(true),
            ValueType::Char => Value::Char('1'),
            ValueType::Byte => Value::Byte(1),
            ValueType::Short => Value::Short(1),
            ValueType::Integer => Value::Integer(1),
            ValueType::Long => Value::Long(1),
            ValueType::BigInteger => Value::BigInteger(1),
            ValueType::Float => Value::Float(1.5),
            ValueType::Double => Value::Double(1.5),
            ValueType::BigDecimal => Value::BigDecimal(one_and_a_half),
            ValueType::Number => Value::Number(ctx.number(one_and_a_half)),
            ValueType::Text => Value::text("123"),
            ValueType::Date => Value::Date(new_years_eve),
            ValueType::DateTime => Value::DateTime(new_years_eve.and_time(noon)),
            ValueType::Time => Value::Time(noon),
            ValueType::Cell => cell("B2")?.into(),
            ValueType::CellRange => CellRange::parse("B2:C3").ok()?.into(),
            ValueType::Column => Selection::Column(ColumnReference::parse("B").ok()?).into(),
            ValueType::ColumnRange => Selection::ColumnRange(ColumnRange::parse("B:C").ok()?).into(),
            ValueType::Row => Selection::Row(RowReference::parse("2").ok()?).into(),
            ValueType::RowRange => Selection::RowRange(RowRange::parse("2:3").ok()?).into(),
            ValueType::Label => LabelName::parse("Label123").ok()?.into(),
            ValueType::Error => Value::Error(SpreadsheetError::selection_not_found(cell("Z99")?.into())),
            ValueType::CellOrCellRange | ValueType::Selection => return None,
        })
    }

    /// Every sample/target pair `converter` fails for `usage`, grouped under the usage name
    ///
    /// A pair fails when `can_convert` refuses it, when `convert` returns any error, or
    /// when the result is not of the requested type.
    pub fn verify(
        converter: &dyn Converter,
        usage: ConverterUsage,
        ctx: &ConverterContext<'_>,
    ) -> MissingConverterSet {
        let mut missing = BTreeSet::new();
        for value_type in ValueType::ALL {
            let Some(sample) = Self::sample(value_type, ctx) else {
                continue;
            };
            for target in usage.required_targets(value_type) {
                let converted = converter.can_convert(&sample, target, ctx)
                    && converter
                        .convert(&sample, target, ctx)
                        .is_ok_and(|value| value.is_assignable_to(target));
                if !converted {
                    missing.insert(MissingConverterValue::new(sample.clone(), target));
                }
            }
        }

        debug!(%usage, %converter, missing = missing.len(), "verified converter");
        if missing.is_empty() {
            MissingConverterSet::empty()
        } else {
            MissingConverterSet::empty().with(MissingConverter::new(usage.name(), missing))
        }
    }

    /// [`verify`](Self::verify) for several usages, merged into one report
    pub fn verify_all(
        converter: &dyn Converter,
        usages: impl IntoIterator<Item = ConverterUsage>,
        ctx: &ConverterContext<'_>,
    ) -> MissingConverterSet {
        MissingConverterSet::merge(
            usages
                .into_iter()
                .map(|usage| Self::verify(converter, usage, ctx)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::SimpleConverter;
    use pretty_assertions::assert_eq;

    fn converter(name: &str, text: &str) -> MissingConverter {
        MissingConverter::new(
            name,
            [MissingConverterValue::new(Value::text(text), ValueType::Text)],
        )
    }

    #[test]
    fn test_json() {
        let set: MissingConverterSet = [converter("converter1", "Hello1")].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(
            json,
            r#"[{"name":"converter1","values":[{"value":"Hello1","type":"alloc::string::String"}]}]"#
        );
        let back: MissingConverterSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_json_values_keep_types() {
        let missing = MissingConverter::new(
            "formula",
            [
                MissingConverterValue::new(Value::Integer(1), ValueType::Date),
                MissingConverterValue::new(Value::Boolean(true), ValueType::Time),
            ],
        );
        let json = serde_json::to_value(&missing).unwrap();
        assert_eq!(
            json["values"][0],
            serde_json::json!({"value": 1, "type": "chrono::NaiveDate"})
        );
        let back: MissingConverter = serde_json::from_value(json).unwrap();
        assert_eq!(back, missing);
    }

    #[test]
    fn test_delete_last_is_empty_instance() {
        let one = converter("converter1", "Hello1");
        let set = MissingConverterSet::empty().with(one.clone());
        assert_eq!(set.len(), 1);

        let deleted = set.delete(&one);
        assert!(deleted.is_empty());
        assert!(deleted.ptr_eq(&MissingConverterSet::empty()));
        assert!(set.delete(&converter("other", "x")).ptr_eq(&set));
    }

    #[test]
    fn test_concat() {
        let a: MissingConverterSet = [converter("b", "1")].into_iter().collect();
        let b: MissingConverterSet = [converter("a", "2"), converter("b", "1")].into_iter().collect();
        let merged = a.concat(&b);
        assert_eq!(
            merged.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert!(MissingConverterSet::empty().concat(&a).ptr_eq(&a));
    }

    #[test]
    fn test_entries_are_keyed_by_name() {
        let set = MissingConverterSet::empty()
            .with(converter("formula", "1"))
            .with(converter("formula", "2"))
            .with(converter("sort", "3"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.value_count(), 3);
        let formula = set.iter().next().unwrap();
        assert_eq!(formula.name, "formula");
        assert_eq!(formula.values.len(), 2);

        let merged = set.concat(&[converter("sort", "4")].into_iter().collect());
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.value_count(), 4);
    }

    #[test]
    fn test_every_runtime_type_has_a_sample() {
        let ctx = ConverterContext::simple();
        for value_type in ValueType::ALL {
            match MissingConverterVerifier::sample(value_type, &ctx) {
                Some(sample) => assert_eq!(sample.value_type(), Some(value_type)),
                None => assert!(matches!(
                    value_type,
                    ValueType::CellOrCellRange | ValueType::Selection
                )),
            }
        }
    }

    #[test]
    fn test_verify_simple_converter() {
        let ctx = ConverterContext::simple();
        let report = MissingConverterVerifier::verify(&SimpleConverter, ConverterUsage::Formatting, &ctx);
        let formatting = report.iter().next().unwrap();
        assert_eq!(formatting.name, "formatting");
        assert!(!formatting
            .values
            .contains(&MissingConverterValue::new(Value::text("123"), ValueType::Text)));
        assert!(formatting
            .values
            .contains(&MissingConverterValue::new(Value::Boolean(true), ValueType::Text)));
    }
}
