use serde::{Deserialize, Serialize};
use serde_json;
use std::collections::HashMap;

use ordered_float::OrderedFloat;
use std::hash::{Hash, Hasher};

/// Runtime value carried through scopes, state entries and resolved
/// properties. Closed union; widgets coerce out of it through
/// [`FromPropValue`], never through reflection.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(untagged)]
pub enum PropValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(OrderedFloat<f64>),
    String(String),
    Array(Vec<PropValue>),
    Object(HashMap<String, PropValue>),
}

impl Hash for PropValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            PropValue::Null => {}
            PropValue::Bool(b) => b.hash(state),
            PropValue::Integer(i) => i.hash(state),
            PropValue::Number(n) => n.hash(state),
            PropValue::String(s) => s.hash(state),
            PropValue::Array(arr) => arr.hash(state),
            PropValue::Object(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by_key(|(k, _)| k.as_str()); // Deterministic order
                for (k, v) in entries {
                    k.hash(state);
                    v.hash(state);
                }
            }
        }
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(OrderedFloat(value))
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Integer(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::String(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<serde_json::Value> for PropValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropValue::Null,
            serde_json::Value::Bool(b) => PropValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PropValue::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    PropValue::Integer(u as i64)
                } else if let Some(f) = n.as_f64() {
                    PropValue::Number(OrderedFloat(f))
                } else {
                    PropValue::Number(OrderedFloat(0.0))
                }
            }
            serde_json::Value::String(s) => PropValue::String(s),
            serde_json::Value::Array(a) => {
                PropValue::Array(a.into_iter().map(|v| v.into()).collect())
            }
            serde_json::Value::Object(o) => {
                PropValue::Object(o.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&PropValue> for serde_json::Value {
    fn from(value: &PropValue) -> Self {
        match value {
            PropValue::Null => serde_json::Value::Null,
            PropValue::Bool(b) => serde_json::Value::Bool(*b),
            PropValue::Integer(i) => serde_json::Value::Number(serde_json::Number::from(*i)),
            PropValue::Number(n) => serde_json::Value::Number(
                serde_json::Number::from_f64(n.into_inner())
                    .unwrap_or_else(|| serde_json::Number::from(0)),
            ),
            PropValue::String(s) => serde_json::Value::String(s.clone()),
            PropValue::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(|v| v.into()).collect())
            }
            PropValue::Object(map) => {
                serde_json::Value::Object(map.iter().map(|(k, v)| (k.clone(), v.into())).collect())
            }
        }
    }
}

/// Type-safe extraction from a [`PropValue`].
///
/// The impls below are the coercion-priority table: `f64` widens from
/// integers, `i64` narrows from fractionless numbers, everything else
/// accepts only its own variant. Strings never coerce from numbers.
pub trait FromPropValue: Sized {
    fn from_prop(value: &PropValue) -> Option<Self>;
}

impl FromPropValue for f64 {
    fn from_prop(value: &PropValue) -> Option<f64> {
        match value {
            PropValue::Number(v) => Some(v.into_inner()),
            PropValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl FromPropValue for i64 {
    fn from_prop(value: &PropValue) -> Option<i64> {
        match value {
            PropValue::Integer(v) => Some(*v),
            PropValue::Number(v) => {
                // Only convert if it's a whole number and fits in i64
                if v.fract().abs() < f64::EPSILON
                    && *v >= OrderedFloat(i64::MIN as f64)
                    && *v <= OrderedFloat(i64::MAX as f64)
                {
                    Some(v.into_inner() as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl FromPropValue for bool {
    fn from_prop(value: &PropValue) -> Option<bool> {
        match value {
            PropValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromPropValue for String {
    fn from_prop(value: &PropValue) -> Option<String> {
        match value {
            PropValue::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromPropValue for Vec<PropValue> {
    fn from_prop(value: &PropValue) -> Option<Vec<PropValue>> {
        match value {
            PropValue::Array(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromPropValue for HashMap<String, PropValue> {
    fn from_prop(value: &PropValue) -> Option<HashMap<String, PropValue>> {
        match value {
            PropValue::Object(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromPropValue for PropValue {
    fn from_prop(value: &PropValue) -> Option<PropValue> {
        Some(value.clone())
    }
}

impl PropValue {
    pub fn get_as<T: FromPropValue>(&self) -> Option<T> {
        T::from_prop(self)
    }

    pub fn object(entries: impl IntoIterator<Item = (String, PropValue)>) -> Self {
        PropValue::Object(entries.into_iter().collect())
    }

    /// Field access used by the path evaluator; `None` for non-objects.
    pub fn field(&self, name: &str) -> Option<&PropValue> {
        match self {
            PropValue::Object(map) => map.get(name),
            _ => None,
        }
    }

    pub fn index(&self, idx: usize) -> Option<&PropValue> {
        match self {
            PropValue::Array(items) => items.get(idx),
            _ => None,
        }
    }
}
