//! Comparison operators.

use crate::error::Result;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::eval;
use crate::remapper::Remapper;
use crate::types::Value;
use crate::util;

/// Checks that all operands deep-equal the first. Fewer than two operands
/// are trivially equal and are not evaluated.
pub fn equals_eval(operands: &[Remapper], input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    if operands.len() <= 1 {
        return Ok(Value::Bool(true));
    }
    let values = operands
        .iter()
        .map(|operand| eval(operand, input, ctx))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Bool(all_equal(&values)))
}

pub(crate) fn all_equal(values: &[Value]) -> bool {
    match values.split_first() {
        Some((first, rest)) => rest.iter().all(|v| util::deep_equal(first, v)),
        None => true,
    }
}

pub fn gt_eval(left: &Remapper, right: &Remapper, input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    let left = eval(left, input, ctx)?;
    let right = eval(right, input, ctx)?;
    Ok(Value::Bool(util::gt(&left, &right)))
}

pub fn lt_eval(left: &Remapper, right: &Remapper, input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    let left = eval(left, input, ctx)?;
    let right = eval(right, input, ctx)?;
    Ok(Value::Bool(util::lt(&left, &right)))
}
