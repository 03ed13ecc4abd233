//! Operators that inspect or clean up the shape of a value.

use crate::types::Value;
use crate::util;

pub fn type_eval(input: &Value) -> Value {
    Value::from(input.type_name())
}

/// Array length or string length in UTF-16 code units.
pub fn len_eval(input: &Value) -> Value {
    match input {
        Value::Array(items) => Value::from(items.len()),
        Value::String(s) => Value::from(util::utf16_len(s)),
        _ => Value::Undefined,
    }
}

pub fn null_strip_eval(depth: Option<usize>, input: &Value) -> Value {
    util::strip_nulls(input, depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lengths() {
        assert_eq!(len_eval(&Value::from(json!([1, 2, 3]))), Value::from(3usize));
        assert_eq!(len_eval(&Value::from("😀")), Value::from(2usize));
        assert_eq!(len_eval(&Value::Number(3.0)), Value::Undefined);
    }

    #[test]
    fn types() {
        assert_eq!(type_eval(&Value::Undefined), Value::from("undefined"));
        assert_eq!(type_eval(&Value::from(json!({}))), Value::from("object"));
    }
}
