//! Value helpers shared by the operators.

use crate::types::{date_to_iso, Object, Value};
use std::cmp::Ordering;

// ----------------------------------------------------------------- Coercion

/// Truthiness used by `if`, `match`, `and`, `or` and `not`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::String(s) => !s.is_empty(),
        Value::Date(_) | Value::Array(_) | Value::Object(_) => true,
    }
}

/// Converts a value to a number. Yields `NaN` where no numeric reading exists.
pub fn num(value: &Value) -> f64 {
    match value {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => *n,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Value::Date(d) => d.timestamp_millis() as f64,
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Converts a value to its string form.
pub fn str_val(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.clone(),
        Value::Date(d) => date_to_iso(d),
        Value::Array(arr) => arr
            .iter()
            .map(|v| if v.is_nullish() { String::new() } else { str_val(v) })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_json().to_string(),
    }
}

pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        n.to_string()
    }
}

/// Length in UTF-16 code units, which is what authors see as string length.
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

// --------------------------------------------------------------- Comparison

/// Structural equality. Numbers compare by value, dates by timestamp and
/// object keys without regard to order.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Date(a), Value::Date(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, va)| match b.get(key) {
                    Some(vb) => deep_equal(va, vb),
                    None => false,
                })
        }
        _ => false,
    }
}

/// Orders two values. Two strings compare lexically; anything else compares
/// numerically, with dates read as epoch milliseconds. `None` when the values
/// have no ordering (e.g. `NaN` is involved).
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(sa), Value::String(sb)) => Some(sa.cmp(sb)),
        (Value::Date(da), Value::Date(db)) => Some(da.cmp(db)),
        _ => num(a).partial_cmp(&num(b)),
    }
}

pub fn gt(a: &Value, b: &Value) -> bool {
    compare(a, b) == Some(Ordering::Greater)
}

pub fn lt(a: &Value, b: &Value) -> bool {
    compare(a, b) == Some(Ordering::Less)
}

// ------------------------------------------------------------------- Access

/// Reads a single property. Arrays and strings answer numeric indices and
/// `length`; everything else yields undefined.
pub fn member(value: &Value, key: &str) -> Value {
    match value {
        Value::Object(obj) => obj.get(key).cloned().unwrap_or_default(),
        Value::Array(arr) => {
            if key == "length" {
                return Value::from(arr.len());
            }
            key.parse::<usize>()
                .ok()
                .and_then(|i| arr.get(i).cloned())
                .unwrap_or_default()
        }
        Value::String(s) => {
            if key == "length" {
                return Value::from(utf16_len(s));
            }
            // Indexes UTF-16 code units, like `length`.
            key.parse::<usize>()
                .ok()
                .and_then(|i| s.encode_utf16().nth(i))
                .map(|unit| Value::String(String::from_utf16_lossy(&[unit])))
                .unwrap_or_default()
        }
        _ => Value::Undefined,
    }
}

/// Follows `path` one segment at a time. A nullish intermediate yields undefined.
pub fn get_path<S: AsRef<str>>(value: &Value, path: &[S]) -> Value {
    let mut current = value.clone();
    for key in path {
        if current.is_nullish() {
            return Value::Undefined;
        }
        current = member(&current, key.as_ref());
    }
    current
}

/// Deletes the last segment of `path` from `obj`. Intermediate segments must
/// already exist and be objects; otherwise nothing happens.
pub fn delete_path<S: AsRef<str>>(obj: &mut Object, path: &[S]) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = obj;
    for key in parents {
        match current.get_mut(key.as_ref()) {
            Some(Value::Object(next)) => current = next,
            _ => return,
        }
    }
    current.shift_remove(last.as_ref());
}

/// Removes nullish entries from objects and arrays, descending at most `depth`
/// levels below the top.
pub fn strip_nulls(value: &Value, depth: Option<usize>) -> Value {
    let child_depth = match depth {
        Some(0) => None,
        Some(d) => Some(Some(d - 1)),
        None => Some(None),
    };
    match value {
        Value::Array(arr) => Value::Array(
            arr.iter()
                .filter(|v| !v.is_nullish())
                .map(|v| match child_depth {
                    Some(d) => strip_nulls(v, d),
                    None => v.clone(),
                })
                .collect(),
        ),
        Value::Object(obj) => Value::Object(
            obj.iter()
                .filter(|(_, v)| !v.is_nullish())
                .map(|(k, v)| {
                    let v = match child_depth {
                        Some(d) => strip_nulls(v, d),
                        None => v.clone(),
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}
