//! Object operators.

use crate::error::Result;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::eval;
use crate::remapper::Remapper;
use crate::types::{Object, Value};
use crate::util;
use indexmap::IndexMap;

/// Builds an object with one entry per prop, each evaluated against `input`.
pub fn build(props: &IndexMap<String, Remapper>, input: &Value, ctx: EvalCtx<'_>) -> Result<Object> {
    props
        .iter()
        .map(|(key, remapper)| Ok((key.clone(), eval(remapper, input, ctx)?)))
        .collect()
}

pub fn from_eval(props: &IndexMap<String, Remapper>, input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    build(props, input, ctx).map(Value::Object)
}

/// Shallow merge; a non-object input starts from an empty object.
pub fn assign_eval(props: &IndexMap<String, Remapper>, input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    let mut target = input.as_object().cloned().unwrap_or_default();
    target.extend(build(props, input, ctx)?);
    Ok(Value::Object(target))
}

pub fn omit_eval(keys: &[Vec<String>], input: &Value) -> Value {
    match input {
        Value::Object(obj) => {
            let mut obj = obj.clone();
            omit_paths(&mut obj, keys);
            Value::Object(obj)
        }
        other => other.clone(),
    }
}

pub(crate) fn omit_paths(obj: &mut Object, keys: &[Vec<String>]) {
    for path in keys {
        util::delete_path(obj, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn omit_top_level_and_nested() {
        let input = Value::from(json!({ "a": { "b": 1, "c": 2 }, "d": 3 }));
        let out = omit_eval(&[path(&["a", "b"]), path(&["d"])], &input);
        assert_eq!(out, Value::from(json!({ "a": { "c": 2 } })));
    }

    #[test]
    fn omit_missing_paths() {
        let input = Value::from(json!({ "a": 1 }));
        assert_eq!(omit_eval(&[path(&["x", "y"]), path(&["a", "b"])], &input), input);
        assert_eq!(omit_eval(&[path(&["a"])], &Value::from("text")), Value::from("text"));
    }
}
