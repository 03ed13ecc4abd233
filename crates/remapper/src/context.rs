use crate::message::{MessageCatalog, MessageResolver};
use crate::random::RandomSource;
use crate::types::{Object, Value};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// OpenID Connect style information about the signed in user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Any additional claims.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl UserInfo {
    /// Reads a claim by name.
    pub fn get(&self, property: &str) -> Value {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(mut claims)) => {
                claims.remove(property).map(Value::from).unwrap_or_default()
            }
            _ => Value::Undefined,
        }
    }
}

/// Ambient data available to every operation during one evaluation.
///
/// Built once per request or render by the caller and never mutated by the
/// evaluator.
#[derive(Clone)]
pub struct Context {
    pub app_id: i64,
    /// URL of the current page.
    pub url: String,
    /// Base URL of the app.
    pub app_url: String,
    pub locale: String,
    pub page_data: Value,
    pub user_info: Option<UserInfo>,
    /// Free-form values supplied by the caller, read by the `context` operation.
    pub context: Object,
    /// Previously computed values, oldest first.
    pub history: Vec<Value>,
    pub messages: Arc<dyn MessageResolver>,
    pub rng: RandomSource,
    /// Fixed "now" for `date.now` and calendar timestamps.
    pub now: Option<DateTime<Utc>>,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            app_id: 0,
            url: String::new(),
            app_url: String::new(),
            locale: "en".to_string(),
            page_data: Value::Undefined,
            user_info: None,
            context: Object::new(),
            history: Vec::new(),
            messages: Arc::new(MessageCatalog::new("en")),
            rng: RandomSource::default(),
            now: None,
        }
    }
}

impl Context {
    pub fn new(app_id: i64, app_url: impl Into<String>, url: impl Into<String>) -> Self {
        Context {
            app_id,
            app_url: app_url.into(),
            url: url.into(),
            ..Context::default()
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_page_data(mut self, page_data: Value) -> Self {
        self.page_data = page_data;
        self
    }

    pub fn with_user_info(mut self, user_info: UserInfo) -> Self {
        self.user_info = Some(user_info);
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    pub fn with_history(mut self, history: Vec<Value>) -> Self {
        self.history = history;
        self
    }

    pub fn with_messages(mut self, messages: Arc<dyn MessageResolver>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_rng(mut self, rng: RandomSource) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// The current instant, or the fixed one if set.
    pub fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("app_id", &self.app_id)
            .field("url", &self.url)
            .field("app_url", &self.app_url)
            .field("locale", &self.locale)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_info_claims() {
        let user: UserInfo = serde_json::from_value(json!({
            "sub": "42",
            "name": "Sandy",
            "email_verified": true,
            "team": "science",
        }))
        .unwrap();
        assert_eq!(user.get("name"), Value::from("Sandy"));
        assert_eq!(user.get("email_verified"), Value::Bool(true));
        assert_eq!(user.get("team"), Value::from("science"));
        assert_eq!(user.get("email"), Value::Undefined);
    }

    #[test]
    fn builder() {
        let ctx = Context::new(3, "https://app.example", "https://app.example/home")
            .with_locale("nl")
            .with_context("key", Value::from("v"));
        assert_eq!(ctx.app_id, 3);
        assert_eq!(ctx.locale, "nl");
        assert_eq!(ctx.context.get("key"), Some(&Value::from("v")));
    }
}
