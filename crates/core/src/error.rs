//! Model error model.

use serde_json::Value;
use thiserror::Error;

/// Result type used across the model layer.
pub type ModelResult<T> = Result<T, ModelError>;

/// Status code the persistence collaborator uses to report success.
pub const CC_SUCCESS: i64 = 0;

/// Model-level error.
///
/// Every public entity operation either succeeds or returns one of these.
/// Nothing here carries user-facing text beyond the remote `code`/`message`
/// pair; localisation happens upstream.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// A required field was absent or held its zero value during `parse`.
    #[error("required field is not set: {0}")]
    MissingRequiredField(String),

    /// A field references a record that does not resolve (e.g. an association
    /// endpoint that names an unknown object).
    #[error("field {field} references an unknown record: {value}")]
    InvalidReference { field: String, value: String },

    /// A dynamic value could not be converted into the typed field.
    #[error("failed to decode field {field} from value {value}")]
    Decode { field: String, value: Value },

    /// The persistence collaborator could not be reached or the call did not
    /// complete.
    #[error("failed to request the persistence collaborator: {0}")]
    Transport(String),

    /// The persistence collaborator completed the call but reported a
    /// non-success status.
    #[error("persistence collaborator returned code {code}: {message}")]
    Remote { code: i64, message: String },

    /// The operation was refused because other records still depend on the
    /// target.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl ModelError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingRequiredField(field.into())
    }

    pub fn invalid_reference(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidReference {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn decode(field: impl Into<String>, value: Value) -> Self {
        Self::Decode {
            field: field.into(),
            value,
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn remote(code: i64, message: impl Into<String>) -> Self {
        Self::Remote {
            code,
            message: message.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// True for errors the caller fixes by correcting its input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredField(_) | Self::InvalidReference { .. }
        )
    }

    /// The remote status code, when the collaborator reported one.
    pub fn remote_code(&self) -> Option<i64> {
        match self {
            Self::Remote { code, .. } => Some(*code),
            _ => None,
        }
    }
}
