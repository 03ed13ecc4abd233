//! Loading a [`Context`] from a YAML or JSON document.
//!
//! ```
//! use remapper::{Context, ContextConfig};
//!
//! let yaml = r#"
//! appId: 42
//! appUrl: https://app.example
//! locale: nl
//! messages:
//!   greeting: Hallo {name}
//! "#;
//! let context = Context::from(ContextConfig::from_yaml(yaml).unwrap());
//! assert_eq!(context.app_id, 42);
//! assert_eq!(context.locale, "nl");
//! ```

use crate::context::{Context, UserInfo};
use crate::message::MessageCatalog;
use crate::random::RandomSource;
use crate::types::Value;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No context config found at this path: {0}")]
    ConfigMissing(PathBuf),

    #[error("Config deserialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Config deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error while reading the context config: {0}")]
    Io(#[from] std::io::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// A [`Context`] described as data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContextConfig {
    #[serde(default)]
    pub app_id: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub app_url: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub page_data: Option<serde_json::Value>,
    #[serde(default)]
    pub user_info: Option<UserInfo>,
    #[serde(default)]
    pub context: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub history: Vec<serde_json::Value>,
    /// Message templates by id, in the context's locale.
    #[serde(default)]
    pub messages: HashMap<String, String>,
    /// Seed for the random operations. Unseeded contexts draw from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Fixed current time, as an RFC 3339 string.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

impl ContextConfig {
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a config file. Files ending in `.json` are parsed as JSON,
    /// anything else as YAML.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::ConfigMissing(path.into()),
            _ => ConfigError::Io(e),
        })?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }
}

impl From<ContextConfig> for Context {
    fn from(config: ContextConfig) -> Self {
        let locale = config.locale.unwrap_or_else(|| "en".to_string());
        Context {
            app_id: config.app_id,
            url: config.url,
            app_url: config.app_url,
            page_data: config.page_data.map(Value::from).unwrap_or_default(),
            user_info: config.user_info,
            context: config
                .context
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect(),
            history: config.history.into_iter().map(Value::from).collect(),
            messages: Arc::new(MessageCatalog {
                locale: locale.clone(),
                messages: config.messages,
            }),
            rng: config.seed.map(RandomSource::from_seed_u64).unwrap_or_default(),
            now: config.now,
            locale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn json_config() {
        let config = ContextConfig::from_json(
            r#"{
                "appId": 1,
                "url": "https://app.example/page",
                "pageData": { "id": 3 },
                "history": [{ "a": 1 }],
                "seed": 9,
                "now": "2024-05-01T12:00:00Z"
            }"#,
        )
        .unwrap();
        let context = Context::from(config);
        assert_eq!(context.locale, "en");
        assert_eq!(context.page_data, Value::from(serde_json::json!({ "id": 3 })));
        assert_eq!(context.history.len(), 1);
        assert_eq!(context.now, Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()));
        assert_eq!(context.rng.seed(), RandomSource::from_seed_u64(9).seed());
    }

    #[test]
    fn messages_use_config_locale() {
        let config = ContextConfig::from_yaml("locale: nl\nmessages:\n  hi: Hoi\n").unwrap();
        let context = Context::from(config);
        let message = context.messages.get_message(Some("hi"), None);
        assert_eq!(message.format(None).unwrap(), "Hoi");
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(matches!(ContextConfig::from_yaml("appId: [1"), Err(ConfigError::Yaml(_))));
        assert!(matches!(ContextConfig::from_json("{\"colour\": 1}"), Err(ConfigError::Json(_))));
        assert!(matches!(
            ContextConfig::load(Path::new("/nonexistent/context.yaml")),
            Err(ConfigError::ConfigMissing(_))
        ));
    }
}
