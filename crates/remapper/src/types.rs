use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Ordered map used for object values. Key order follows insertion order.
pub type Object = IndexMap<String, Value>;

/// A value flowing through a remapper.
///
/// This is a superset of JSON: it adds `Undefined` (the result of reading a
/// missing property) and a native `Date` instant. Converting back to JSON drops
/// undefined object entries and renders dates as ISO-8601 strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    /// `null` or undefined.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Name of the value's type as reported by the `type` operation.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Builds a date from milliseconds since the Unix epoch.
    pub fn date_from_millis(millis: f64) -> Option<Value> {
        if !millis.is_finite() {
            return None;
        }
        Utc.timestamp_millis_opt(millis.round() as i64)
            .single()
            .map(Value::Date)
    }

    /// Converts to JSON, consuming `self`.
    pub fn into_json(self) -> serde_json::Value {
        self.into()
    }

    /// Converts to JSON without consuming `self`.
    pub fn to_json(&self) -> serde_json::Value {
        self.clone().into()
    }
}

/// Renders a date the way JSON serialization does: ISO-8601, UTC, milliseconds.
pub fn date_to_iso(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn number_to_json(n: f64) -> serde_json::Value {
    // Whole numbers inside the safe integer range serialize without a fraction.
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        Value::from(v.clone())
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => number_to_json(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::Date(d) => serde_json::Value::String(date_to_iso(&d)),
            Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(Into::into).collect()),
            Value::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k, v.into()))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn whole_numbers_serialize_as_integers() {
        assert_eq!(Value::Number(3.0).into_json(), json!(3));
        assert_eq!(Value::Number(1.5).into_json(), json!(1.5));
        assert_eq!(Value::Number(f64::NAN).into_json(), json!(null));
    }

    #[test]
    fn undefined_object_entries_are_dropped() {
        let mut obj = Object::new();
        obj.insert("a".into(), Value::Undefined);
        obj.insert("b".into(), Value::Null);
        assert_eq!(Value::Object(obj).into_json(), json!({"b": null}));
        assert_eq!(
            Value::Array(vec![Value::Undefined, 1.0.into()]).into_json(),
            json!([null, 1])
        );
    }

    #[test]
    fn dates_serialize_with_millis() {
        let date = Value::date_from_millis(1_577_836_800_000.0).unwrap();
        assert_eq!(date.into_json(), json!("2020-01-01T00:00:00.000Z"));
    }

    #[test]
    fn object_order_is_preserved() {
        let v = Value::from(json!({"z": 1, "a": 2}));
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn deserializes_through_json() {
        let v: Value = serde_json::from_str(r#"{"a": [1, "x", null]}"#).unwrap();
        assert_eq!(v, Value::from(json!({"a": [1, "x", null]})));
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"a":[1,"x",null]}"#);
    }
}
