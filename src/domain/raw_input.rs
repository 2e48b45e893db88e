// ============================================================
// Layer 3 — RawInput Domain Type
// ============================================================
// One request's worth of user input, before any encoding.
//
// Values arrive either as strings (HTML-form style, every value
// is text) or as JSON scalars (API style, numbers may be real
// numbers). Fields may be missing entirely or explicitly null;
// both count as "absent" downstream.
//
// Any other JSON value (bool, array, object) is kept as-is in
// `Other`. It never fails parsing: a categorical field treats it
// as an unrecognised label, a numeric field as not a number, and
// a field outside the variant never looks at it.
//
// Numbers keep their JSON form, so `2` is echoed back as `2`,
// not `2.0`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A single raw field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(Number),
    Text(String),
    Null,
    Other(Value),
}

impl RawValue {
    /// Text content with surrounding whitespace removed.
    /// Only text values have a label.
    pub fn as_label(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s.trim()),
            _ => None,
        }
    }

    /// A JSON number as f64
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{n}"),
            RawValue::Text(s)   => f.write_str(s),
            RawValue::Null      => f.write_str("null"),
            RawValue::Other(v)  => write!(f, "{v}"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self { RawValue::Text(s.to_string()) }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self { RawValue::Text(s) }
}

/// NaN and infinities have no JSON form; they are kept as text
/// so the normalizer still rejects them as non-finite.
impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        match Number::from_f64(n) {
            Some(n) => RawValue::Number(n),
            None    => RawValue::Text(n.to_string()),
        }
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self { RawValue::Number(Number::from(n)) }
}

/// Field name → raw value, partially populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInput {
    fields: BTreeMap<String, RawValue>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for tests and the sampler
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Value for `name`, treating an explicit null the same as a missing key
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Build from `key=value` pairs as submitted by a form;
    /// every value is kept as text.
    pub fn from_form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), RawValue::Text(v.into())))
            .collect();
        Self { fields }
    }

    /// Parse a JSON object body. Any JSON value is accepted per field.
    pub fn from_json_str(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}
