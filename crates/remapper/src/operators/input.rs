//! Input access: the current value, the root, prior values and the array frame.

use crate::eval_ctx::EvalCtx;
use crate::remapper::ArrayField;
use crate::types::Value;
use crate::util;

pub fn prop_eval(path: &[String], input: &Value) -> Value {
    util::get_path(input, path)
}

pub fn root_eval(ctx: EvalCtx<'_>) -> Value {
    ctx.root.clone()
}

pub fn prior_eval(index: i64, ctx: EvalCtx<'_>) -> Value {
    ctx.history(index)
}

/// Undefined outside of array iteration.
pub fn array_eval(field: ArrayField, ctx: EvalCtx<'_>) -> Value {
    match (ctx.array, field) {
        (Some(frame), ArrayField::Index) => Value::from(frame.index),
        (Some(frame), ArrayField::Length) => Value::from(frame.length),
        (None, _) => Value::Undefined,
    }
}
