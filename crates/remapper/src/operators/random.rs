//! Random operators. All randomness comes from the context's `RandomSource`.

use crate::eval_ctx::EvalCtx;
use crate::types::Value;

/// A uniformly chosen element; a non-array passes through.
pub fn choice_eval(input: &Value, ctx: EvalCtx<'_>) -> Value {
    match input {
        Value::Array(items) if items.is_empty() => Value::Undefined,
        Value::Array(items) => items[ctx.context.rng.index(items.len())].clone(),
        other => other.clone(),
    }
}

/// An integer in `[min, max)`, or `min` when the range is empty.
pub fn integer_eval(min: f64, max: f64, ctx: EvalCtx<'_>) -> Value {
    if min == max {
        return Value::Number(min);
    }
    Value::Number((min + ctx.context.rng.float() * (max - min)).floor())
}

pub fn float_eval(min: f64, max: f64, ctx: EvalCtx<'_>) -> Value {
    Value::Number(min + ctx.context.rng.float() * (max - min))
}

/// Draws `length + 1` characters from `choice`.
pub fn string_eval(choice: &[char], length: usize, ctx: EvalCtx<'_>) -> Value {
    if choice.is_empty() {
        return Value::String(String::new());
    }
    let rng = &ctx.context.rng;
    Value::String((0..=length).map(|_| choice[rng.index(choice.len())]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::random::RandomSource;

    fn context() -> Context {
        Context::default().with_rng(RandomSource::from_seed_u64(11))
    }

    #[test]
    fn integers_stay_in_range() {
        let context = context();
        let input = Value::Null;
        let ctx = EvalCtx::new(&context, &input);
        for _ in 0..200 {
            let Value::Number(n) = integer_eval(3.0, 7.0, ctx) else {
                panic!("expected a number");
            };
            assert!((3.0..7.0).contains(&n));
            assert_eq!(n.fract(), 0.0);
        }
        assert_eq!(integer_eval(4.0, 4.0, ctx), Value::Number(4.0));
    }

    #[test]
    fn strings_draw_one_extra_character() {
        let context = context();
        let input = Value::Null;
        let ctx = EvalCtx::new(&context, &input);
        let Value::String(s) = string_eval(&['a', 'b'], 4, ctx) else {
            panic!("expected a string");
        };
        assert_eq!(s.chars().count(), 5);
        assert!(s.chars().all(|c| c == 'a' || c == 'b'));
        assert_eq!(string_eval(&[], 4, ctx), Value::from(""));
    }

    #[test]
    fn choice_passes_non_arrays_through() {
        let context = context();
        let input = Value::Null;
        let ctx = EvalCtx::new(&context, &input);
        assert_eq!(choice_eval(&Value::from("x"), ctx), Value::from("x"));
        assert_eq!(choice_eval(&Value::Array(vec![]), ctx), Value::Undefined);
        assert_eq!(choice_eval(&Value::Array(vec![Value::Null]), ctx), Value::Null);
    }
}
