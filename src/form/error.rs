use thiserror::Error;

/// A mismatch between a host data shape and what the editor supports.
///
/// These are programming errors in the host's shape declarations. They abort
/// the dialog being rendered and name the JSON pointer of the field at fault.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{}: no widget handler registered for {kind}", location(.pointer))]
    Unhandled { pointer: String, kind: String },

    #[error(
        "{}: OneOf alternative `{field}` must be an optional field, found {kind}",
        location(.pointer)
    )]
    OneOfAlternative {
        pointer: String,
        field: String,
        kind: String,
    },

    #[error("{}: OneOf record declares no alternatives", location(.pointer))]
    EmptyOneOf { pointer: String },

    #[error("value to edit must be a record or an optional record, found {kind}")]
    NotARecord { kind: String },

    #[error("{}: expected {expected}, found {found}", location(.pointer))]
    ShapeMismatch {
        pointer: String,
        expected: String,
        found: String,
    },

    #[error("{}: no value at this location", location(.pointer))]
    MissingValue { pointer: String },

    #[error("{}: nesting exceeds {limit} levels", location(.pointer))]
    DepthExceeded { pointer: String, limit: usize },

    #[error("{}: {source}", location(.pointer))]
    Serde {
        pointer: String,
        source: serde_json::Error,
    },
}

pub(crate) fn location(pointer: &str) -> &str {
    if pointer.is_empty() { "(root)" } else { pointer }
}

impl ConfigError {
    pub fn unhandled(pointer: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::Unhandled {
            pointer: pointer.into(),
            kind: kind.into(),
        }
    }

    pub fn shape_mismatch(
        pointer: impl Into<String>,
        expected: impl Into<String>,
        found: &serde_json::Value,
    ) -> Self {
        Self::ShapeMismatch {
            pointer: pointer.into(),
            expected: expected.into(),
            found: json_type(found).to_string(),
        }
    }

    pub fn missing(pointer: impl Into<String>) -> Self {
        Self::MissingValue {
            pointer: pointer.into(),
        }
    }

    pub fn serde(pointer: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serde {
            pointer: pointer.into(),
            source,
        }
    }

    /// JSON pointer of the offending field; empty for the root and for errors
    /// not tied to one field.
    pub fn pointer(&self) -> &str {
        match self {
            Self::Unhandled { pointer, .. }
            | Self::OneOfAlternative { pointer, .. }
            | Self::EmptyOneOf { pointer }
            | Self::ShapeMismatch { pointer, .. }
            | Self::MissingValue { pointer }
            | Self::DepthExceeded { pointer, .. }
            | Self::Serde { pointer, .. } => pointer,
            Self::NotARecord { .. } => "",
        }
    }
}

pub(crate) fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
