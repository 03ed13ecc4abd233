//! Operators that combine the input with a value from the history.

use super::object::{build, omit_paths};
use crate::error::Result;
use crate::eval_ctx::EvalCtx;
use crate::remapper::Remapper;
use crate::types::Value;
use indexmap::IndexMap;

pub fn from_history_eval(index: i64, props: &IndexMap<String, Remapper>, ctx: EvalCtx<'_>) -> Result<Value> {
    let past = ctx.history(index);
    build(props, &past, ctx).map(Value::Object)
}

pub fn assign_history_eval(
    index: i64,
    props: &IndexMap<String, Remapper>,
    input: &Value,
    ctx: EvalCtx<'_>,
) -> Result<Value> {
    let past = ctx.history(index);
    let mut target = input.as_object().cloned().unwrap_or_default();
    target.extend(build(props, &past, ctx)?);
    Ok(Value::Object(target))
}

/// The input overlaid with `history[index]`, minus `keys`.
pub fn omit_history_eval(index: i64, keys: &[Vec<String>], input: &Value, ctx: EvalCtx<'_>) -> Value {
    let mut past = match ctx.history(index) {
        Value::Object(obj) => obj,
        _ => Default::default(),
    };
    omit_paths(&mut past, keys);
    let mut target = input.as_object().cloned().unwrap_or_default();
    target.extend(past);
    Value::Object(target)
}
