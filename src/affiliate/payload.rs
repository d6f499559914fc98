//! Signable request payloads.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

/// A request body as seen by the signing protocol.
///
/// Mappings keep their insertion order; the signer sorts keys itself, so the
/// order entries are added in never affects the signature.
#[derive(Debug, Clone, PartialEq)]
pub enum SignaturePayload {
    Mapping(Vec<(String, SignaturePayload)>),
    Sequence(Vec<SignaturePayload>),
    DateTime(DateTime<Utc>),
    Primitive(Primitive),
    Null,
}

/// Leaf values of a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    String(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
}

impl Primitive {
    /// String form used in the signature base string.
    ///
    /// Floats follow the partner's reference client number formatting:
    /// integral values have no fractional part (`2.0` becomes `"2"`), and
    /// magnitudes below `1e-6` or from `1e21` up use exponent notation
    /// (`1e-7`, `1e+21`).
    pub fn to_signature_string(&self) -> String {
        match self {
            Self::String(value) => value.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Unsigned(value) => value.to_string(),
            Self::Float(value) => format_float(*value),
            Self::Bool(value) => value.to_string(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::String(value) => Value::String(value.clone()),
            Self::Integer(value) => Value::from(*value),
            Self::Unsigned(value) => Value::from(*value),
            Self::Float(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
            Self::Bool(value) => Value::Bool(*value),
        }
    }
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let name = if value > 0.0 { "Infinity" } else { "-Infinity" };
        name.to_string()
    } else if value != 0.0 && (value.abs() < 1e-6 || value.abs() >= 1e21) {
        let formatted = format!("{:e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    } else if value.fract() == 0.0 {
        (value as i128).to_string()
    } else {
        value.to_string()
    }
}

/// Render a timestamp as a full ISO-8601 instant (`2024-05-01T10:00:00.000Z`).
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl SignaturePayload {
    /// An empty mapping.
    #[must_use]
    pub fn mapping() -> Self {
        Self::Mapping(Vec::new())
    }

    /// Add or replace a key, builder style. Has no effect on non-mappings.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SignaturePayload>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a key. Has no effect on non-mappings.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SignaturePayload>) {
        if let Self::Mapping(entries) = self {
            let key = key.into();
            let value = value.into();
            match entries.iter_mut().find(|(existing, _)| *existing == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
    }

    /// Look up a key in a mapping.
    pub fn get(&self, key: &str) -> Option<&SignaturePayload> {
        match self {
            Self::Mapping(entries) => entries
                .iter()
                .find(|(existing, _)| existing == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Convert to the JSON body sent on the wire.
    ///
    /// Timestamps are written in the same ISO-8601 form they are signed in.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Mapping(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json());
                }
                Value::Object(map)
            }
            Self::Sequence(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::DateTime(instant) => Value::String(format_instant(instant)),
            Self::Primitive(primitive) => primitive.to_json(),
            Self::Null => Value::Null,
        }
    }
}

impl From<Value> for SignaturePayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Primitive(Primitive::Bool(b)),
            Value::Number(n) => Self::Primitive(number_to_primitive(&n)),
            Value::String(s) => Self::Primitive(Primitive::String(s)),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

fn number_to_primitive(n: &Number) -> Primitive {
    if let Some(i) = n.as_i64() {
        Primitive::Integer(i)
    } else if let Some(u) = n.as_u64() {
        Primitive::Unsigned(u)
    } else {
        Primitive::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl From<&str> for SignaturePayload {
    fn from(value: &str) -> Self {
        Self::Primitive(Primitive::String(value.to_string()))
    }
}

impl From<String> for SignaturePayload {
    fn from(value: String) -> Self {
        Self::Primitive(Primitive::String(value))
    }
}

impl From<i64> for SignaturePayload {
    fn from(value: i64) -> Self {
        Self::Primitive(Primitive::Integer(value))
    }
}

impl From<i32> for SignaturePayload {
    fn from(value: i32) -> Self {
        Self::Primitive(Primitive::Integer(i64::from(value)))
    }
}

impl From<u32> for SignaturePayload {
    fn from(value: u32) -> Self {
        Self::Primitive(Primitive::Integer(i64::from(value)))
    }
}

impl From<u64> for SignaturePayload {
    fn from(value: u64) -> Self {
        Self::Primitive(Primitive::Unsigned(value))
    }
}

impl From<f64> for SignaturePayload {
    fn from(value: f64) -> Self {
        Self::Primitive(Primitive::Float(value))
    }
}

impl From<bool> for SignaturePayload {
    fn from(value: bool) -> Self {
        Self::Primitive(Primitive::Bool(value))
    }
}

impl From<DateTime<Utc>> for SignaturePayload {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<SignaturePayload>> From<Vec<T>> for SignaturePayload {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SignaturePayload>> From<Option<T>> for SignaturePayload {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
