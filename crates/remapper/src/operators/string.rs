//! String and i18n operators.

use super::object::build;
use crate::eval_ctx::EvalCtx;
use crate::remapper::{Case, StringFormatArgs};
use crate::types::Value;
use crate::util;
use regex::Regex;
use tracing::debug;

/// Changes the case of string input. Other input, or an unknown case, passes
/// through.
pub fn case_eval(case: Option<Case>, input: &Value) -> Value {
    match (case, input) {
        (Some(Case::Upper), Value::String(s)) => Value::String(s.to_uppercase()),
        (Some(Case::Lower), Value::String(s)) => Value::String(s.to_lowercase()),
        _ => input.clone(),
    }
}

/// Formats a message with evaluated values. Never fails: errors from the
/// values or the formatting degrade to `{messageId}` or to the error text.
pub fn format_eval(args: &StringFormatArgs, input: &Value, ctx: EvalCtx<'_>) -> Value {
    match format_message(args, input, ctx) {
        Ok(text) => Value::String(text),
        Err(error) => {
            debug!(message_id = args.message_id.as_deref(), %error, "string.format failed");
            Value::String(match &args.message_id {
                Some(id) => format!("{{{id}}}"),
                None => error,
            })
        }
    }
}

fn format_message(args: &StringFormatArgs, input: &Value, ctx: EvalCtx<'_>) -> Result<String, String> {
    let values = match &args.values {
        Some(props) => Some(build(props, input, ctx).map_err(|e| e.to_string())?),
        None => None,
    };
    let message = ctx
        .context
        .messages
        .get_message(args.message_id.as_deref(), args.template.as_deref());
    message.format(values.as_ref()).map_err(|e| e.to_string())
}

/// Replaces every match in the string form of the input.
pub fn replace_eval(pattern: &Regex, replacement: &str, input: &Value) -> Value {
    let text = util::str_val(input);
    Value::String(pattern.replace_all(&text, replacement).into_owned())
}

/// Formats message `id` without values; an empty or failing message renders
/// as `{id}`.
pub fn translate_eval(id: &str, ctx: EvalCtx<'_>) -> Value {
    let message = ctx.context.messages.get_message(Some(id), None);
    match message.format(None) {
        Ok(text) if !text.is_empty() => Value::String(text),
        Ok(_) => Value::String(format!("{{{id}}}")),
        Err(e) => {
            debug!(message_id = id, error = %e, "translate failed");
            Value::String(format!("{{{id}}}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case() {
        assert_eq!(case_eval(Some(Case::Upper), &Value::from("abc")), Value::from("ABC"));
        assert_eq!(case_eval(Some(Case::Lower), &Value::from("ÄBC")), Value::from("äbc"));
        assert_eq!(case_eval(None, &Value::from("Abc")), Value::from("Abc"));
        assert_eq!(case_eval(Some(Case::Upper), &Value::Number(1.0)), Value::Number(1.0));
    }

    #[test]
    fn replace_is_global_and_multiline() {
        let pattern = Regex::new("(?m)^o").unwrap();
        assert_eq!(replace_eval(&pattern, "0", &Value::from("oo\noo")), Value::from("0o\n0o"));
        let pattern = Regex::new("(?m)(\\w+)@").unwrap();
        assert_eq!(replace_eval(&pattern, "${1} at ", &Value::from("me@x")), Value::from("me at x"));
    }
}
