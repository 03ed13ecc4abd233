//! The `log` operator.

use crate::eval_ctx::EvalCtx;
use crate::types::Value;
use tracing::{event, Level};

/// Logs the input with a summary of the context and returns it unchanged.
pub fn log_eval(level: Level, input: &Value, ctx: EvalCtx<'_>) -> Value {
    let value = input.to_json().to_string();
    let context = ctx.context;
    let array_index = ctx.array.map(|frame| frame.index);
    let history = context.history.len();

    // `event!` needs a constant level per callsite.
    macro_rules! log_at {
        ($level:expr) => {
            event!(
                $level,
                input = %value,
                app_id = context.app_id,
                url = %context.url,
                ?array_index,
                history,
                "remapper log"
            )
        };
    }
    match level {
        Level::ERROR => log_at!(Level::ERROR),
        Level::WARN => log_at!(Level::WARN),
        Level::DEBUG => log_at!(Level::DEBUG),
        Level::TRACE => log_at!(Level::TRACE),
        _ => log_at!(Level::INFO),
    }
    input.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use serde_json::json;

    #[test]
    fn returns_input_at_every_level() {
        let context = Context::default();
        let input = Value::from(json!({ "a": [1, null] }));
        let ctx = EvalCtx::new(&context, &input);
        for level in [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE] {
            assert_eq!(log_eval(level, &input, ctx), input);
        }
    }
}
