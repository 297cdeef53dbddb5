//! Forgiving field readers for the curated dataset.
//!
//! The dataset is never repaired, only read defensively: a field with an unexpected JSON type
//! reads as absent instead of failing the whole document.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::dataset::model::RawGender;

/// `null` (or a missing field, combined with `#[serde(default)]`) reads as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// A finite JSON number, anything else is `None`.
pub(crate) fn finite<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(finite_value(&Value::deserialize(d)?))
}

/// A finite JSON number, anything else is `0`.
pub(crate) fn number_or_zero<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(finite_value(&Value::deserialize(d)?).unwrap_or(0.0))
}

/// A non-negative count; fractional values are truncated, anything else is `0`.
pub(crate) fn count<'de, D>(d: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = finite_value(&Value::deserialize(d)?).unwrap_or(0.0);
    Ok(if v > 0.0 { v.trunc() as u64 } else { 0 })
}

/// Identifier or label: strings as-is, numbers in their JSON spelling, empty strings as `None`.
pub(crate) fn key<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(key_value(&Value::deserialize(d)?))
}

/// Same as [`key`] but `""` when absent.
pub(crate) fn key_or_empty<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(key_value(&Value::deserialize(d)?).unwrap_or_default())
}

/// JavaScript-style truthiness.
pub(crate) fn truthy<'de, D>(d: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(truthy_value(&Value::deserialize(d)?))
}

/// Optional flag: booleans only.
pub(crate) fn flag<'de, D>(d: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(d)?.as_bool())
}

/// Speaker list: string or numeric entries, everything else dropped.
pub(crate) fn names<'de, D, C>(d: D) -> Result<C, D::Error>
where
    D: Deserializer<'de>,
    C: Default + Extend<String>,
{
    let mut out = C::default();
    if let Value::Array(items) = Value::deserialize(d)? {
        out.extend(items.iter().filter_map(key_value));
    }
    Ok(out)
}

/// Raw gender hint in any of its encodings.
pub(crate) fn raw_gender<'de, D>(d: D) -> Result<Option<RawGender>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => Some(RawGender::Flag(b)),
        Value::String(s) => Some(RawGender::Code(s)),
        _ => None,
    })
}

/// Name → truthy map.
pub(crate) fn truthy_map<'de, D>(d: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(d)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|(name, v)| (name, truthy_value(&v)))
        .collect())
}

fn finite_value(v: &Value) -> Option<f64> {
    v.as_f64().filter(|x| x.is_finite())
}

fn key_value(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn truthy_value(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0 && !x.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
