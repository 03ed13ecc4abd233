use crate::ics::CalendarError;
use thiserror::Error;

/// Errors raised while parsing or evaluating a remapper.
///
/// Every variant carries the JSON of the offending remapper for diagnostics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemapperError {
    #[error("Remapper must have exactly one key, found {}: [{}]", keys.len(), keys.join(", "))]
    Structural {
        keys: Vec<String>,
        remapper: serde_json::Value,
    },

    #[error("Remapper {name} does not exist")]
    UnknownOperation {
        name: String,
        remapper: serde_json::Value,
    },

    #[error("Invalid arguments for \"{operation}\": {message}")]
    InvalidArgument {
        operation: String,
        message: String,
        remapper: serde_json::Value,
    },

    #[error("Failed to create calendar event: {source}")]
    Calendar {
        source: CalendarError,
        remapper: serde_json::Value,
    },
}

impl RemapperError {
    /// The remapper that caused the error.
    pub fn remapper(&self) -> &serde_json::Value {
        match self {
            RemapperError::Structural { remapper, .. }
            | RemapperError::UnknownOperation { remapper, .. }
            | RemapperError::InvalidArgument { remapper, .. }
            | RemapperError::Calendar { remapper, .. } => remapper,
        }
    }

    pub(crate) fn invalid(operation: &str, message: impl Into<String>, remapper: &serde_json::Value) -> Self {
        RemapperError::InvalidArgument {
            operation: operation.to_string(),
            message: message.into(),
            remapper: remapper.clone(),
        }
    }
}

pub type Result<T, E = RemapperError> = std::result::Result<T, E>;
