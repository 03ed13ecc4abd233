//! Logical operators.

use super::comparison::all_equal;
use crate::error::Result;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::eval;
use crate::remapper::Remapper;
use crate::types::Value;
use crate::util;

/// Negates a single operand's truthiness, or checks that several operands
/// are not all equal. No operands is `true`.
pub fn not_eval(operands: &[Remapper], input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    if operands.is_empty() {
        return Ok(Value::Bool(true));
    }
    let values = operands
        .iter()
        .map(|operand| eval(operand, input, ctx))
        .collect::<Result<Vec<_>>>()?;
    if values.len() <= 1 {
        let value = values.first().unwrap_or(&Value::Undefined);
        return Ok(Value::Bool(!util::is_truthy(value)));
    }
    Ok(Value::Bool(!all_equal(&values)))
}

/// Stops at the first falsy operand.
pub fn and_eval(operands: &[Remapper], input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    for operand in operands {
        if !util::is_truthy(&eval(operand, input, ctx)?) {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

/// Stops at the first truthy operand.
pub fn or_eval(operands: &[Remapper], input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    for operand in operands {
        if util::is_truthy(&eval(operand, input, ctx)?) {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}
