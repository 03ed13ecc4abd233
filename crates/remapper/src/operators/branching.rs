//! Branching operators. Only the selected branch is evaluated.

use crate::error::Result;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::eval;
use crate::remapper::{MatchCase, Remapper};
use crate::types::Value;
use crate::util;

pub fn if_eval(
    condition: &Remapper,
    then: &Remapper,
    otherwise: &Remapper,
    input: &Value,
    ctx: EvalCtx<'_>,
) -> Result<Value> {
    if util::is_truthy(&eval(condition, input, ctx)?) {
        eval(then, input, ctx)
    } else {
        eval(otherwise, input, ctx)
    }
}

pub fn match_eval(cases: &[MatchCase], input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    for MatchCase { case, value } in cases {
        if util::is_truthy(&eval(case, input, ctx)?) {
            return eval(value, input, ctx);
        }
    }
    Ok(Value::Undefined)
}
