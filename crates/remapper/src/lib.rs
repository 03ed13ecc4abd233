//! Remapper evaluator.
//!
//! # Overview
//!
//! A remapper is a JSON tree describing how to derive a value from runtime
//! data: a literal, a single-key operation object such as `{"prop": "name"}`,
//! or an array of operations applied left to right. Trees are validated once
//! into a [`Remapper`] and then evaluated against an input [`Value`] and a
//! caller-built [`Context`].
//!
//! # Example
//!
//! ```
//! use remapper::{remap, Context, Value};
//! use serde_json::json;
//!
//! let input = Value::from(json!([{ "firstName": "John" }, { "firstName": "Jane" }]));
//! let result = remap(
//!     &json!([{ "array.map": { "prop": "firstName" } }, { "array.unique": null }]),
//!     &input,
//!     &Context::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(result.into_json(), json!(["John", "Jane"]));
//! ```

pub mod config;
pub mod context;
pub mod dates;
pub mod duration;
pub mod error;
pub mod eval_ctx;
pub mod evaluate;
pub mod ics;
pub mod message;
pub mod operators;
pub mod random;
pub mod remapper;
pub mod types;
pub mod util;

// Re-export the core public API
pub use config::{ConfigError, ContextConfig};
pub use context::{Context, UserInfo};
pub use error::RemapperError;
pub use eval_ctx::{ArrayFrame, EvalCtx};
pub use evaluate::{evaluate, remap};
pub use ics::CalendarError;
pub use message::{Message, MessageCatalog, MessageError, MessageResolver};
pub use random::RandomSource;
pub use remapper::{Operation, OperationKind, Remapper};
pub use types::{Object, Value};
