//! Ambient operators: read the caller's context rather than the input.

use crate::eval_ctx::EvalCtx;
use crate::remapper::{AppField, PageField};
use crate::types::Value;
use crate::util;

pub fn app_eval(field: AppField, ctx: EvalCtx<'_>) -> Value {
    let context = ctx.context;
    match field {
        AppField::Id => Value::from(context.app_id),
        AppField::Locale => Value::from(context.locale.as_str()),
        AppField::Url => Value::from(context.app_url.as_str()),
    }
}

pub fn page_eval(field: PageField, ctx: EvalCtx<'_>) -> Value {
    match field {
        PageField::Data => ctx.context.page_data.clone(),
        PageField::Url => Value::from(ctx.context.url.as_str()),
    }
}

/// Dot-path lookup into the free-form context map. Missing values are `null`.
pub fn context_eval(path: &[String], ctx: EvalCtx<'_>) -> Value {
    let Some((first, rest)) = path.split_first() else {
        return Value::Null;
    };
    match ctx.context.context.get(first) {
        Some(value) => match util::get_path(value, rest) {
            Value::Undefined => Value::Null,
            found => found,
        },
        None => Value::Null,
    }
}

pub fn user_eval(property: &str, ctx: EvalCtx<'_>) -> Value {
    ctx.context
        .user_info
        .as_ref()
        .map(|user| user.get(property))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Context, UserInfo};
    use serde_json::json;

    #[test]
    fn reads_app_and_page() {
        let context = Context::new(7, "https://app.example", "https://app.example/page")
            .with_page_data(Value::from(json!({ "x": 1 })));
        let input = Value::Null;
        let ctx = EvalCtx::new(&context, &input);
        assert_eq!(app_eval(AppField::Id, ctx), Value::Number(7.0));
        assert_eq!(app_eval(AppField::Url, ctx), Value::from("https://app.example"));
        assert_eq!(page_eval(PageField::Url, ctx), Value::from("https://app.example/page"));
        assert_eq!(page_eval(PageField::Data, ctx), Value::from(json!({ "x": 1 })));
    }

    #[test]
    fn context_paths() {
        let context = Context::default().with_context("a", Value::from(json!({ "b": { "c": 3 } })));
        let input = Value::Null;
        let ctx = EvalCtx::new(&context, &input);
        let path = |p: &str| p.split('.').map(String::from).collect::<Vec<_>>();
        assert_eq!(context_eval(&path("a.b.c"), ctx), Value::Number(3.0));
        assert_eq!(context_eval(&path("a.x.c"), ctx), Value::Null);
        assert_eq!(context_eval(&path("missing"), ctx), Value::Null);
    }

    #[test]
    fn user_without_user_info() {
        let context = Context::default();
        let input = Value::Null;
        assert_eq!(user_eval("name", EvalCtx::new(&context, &input)), Value::Undefined);

        let context = context.with_user_info(UserInfo {
            sub: "1".into(),
            name: Some("Patrick".into()),
            ..UserInfo::default()
        });
        assert_eq!(user_eval("name", EvalCtx::new(&context, &input)), Value::from("Patrick"));
    }
}
