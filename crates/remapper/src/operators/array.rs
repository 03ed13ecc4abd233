//! Array operators.

use crate::error::Result;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::eval;
use crate::remapper::Remapper;
use crate::types::Value;
use crate::util;

/// Maps every element with the `array` frame set; a non-array yields `[]`.
pub fn map_eval(remapper: &Remapper, input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    let Value::Array(items) = input else {
        return Ok(Value::Array(Vec::new()));
    };
    let length = items.len();
    items
        .iter()
        .enumerate()
        .map(|(index, item)| eval(remapper, item, ctx.with_array(index, length)))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

/// Keeps the first element for each distinct key. Without a key remapper the
/// element itself is the key. A non-array passes through.
pub fn unique_eval(key: Option<&Remapper>, input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    let Value::Array(items) = input else {
        return Ok(input.clone());
    };
    let length = items.len();
    let mut seen: Vec<Value> = Vec::new();
    let mut out = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let id = match key {
            Some(key) => eval(key, item, ctx.with_array(index, length))?,
            None => item.clone(),
        };
        if !seen.iter().any(|s| util::deep_equal(s, &id)) {
            seen.push(id);
            out.push(item.clone());
        }
    }
    Ok(Value::Array(out))
}

pub fn from_eval(items: &[Remapper], input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    items
        .iter()
        .map(|item| eval(item, input, ctx))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

pub fn append_eval(items: &[Remapper], input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    let Value::Array(existing) = input else {
        return Ok(Value::Array(Vec::new()));
    };
    let mut out = existing.clone();
    for item in items {
        out.push(eval(item, input, ctx)?);
    }
    Ok(Value::Array(out))
}

/// Drops the elements at the evaluated indices. Results that are not
/// non-negative integers are ignored.
pub fn omit_eval(indices: &[Remapper], input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    let Value::Array(items) = input else {
        return Ok(Value::Array(Vec::new()));
    };
    let mut omitted = Vec::with_capacity(indices.len());
    for index in indices {
        if let Value::Number(n) = eval(index, input, ctx)? {
            if n >= 0.0 && n.fract() == 0.0 {
                omitted.push(n as usize);
            }
        }
    }
    Ok(Value::Array(
        items
            .iter()
            .enumerate()
            .filter(|(i, _)| !omitted.contains(i))
            .map(|(_, item)| item.clone())
            .collect(),
    ))
}
