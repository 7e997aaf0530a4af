use thiserror::Error;

/// Failures reported by a component registry.
///
/// The resolver never surfaces these to its callers; they are logged and the
/// lookup is treated as a miss.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("component '{key}' is already registered")]
    Duplicate { key: String },

    #[error("registry is not active")]
    NotActive,

    #[error("component '{key}' is not a {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("failed to create component '{key}': {reason}")]
    Creation { key: String, reason: String },

    #[error("{message}")]
    Message { message: String },
}

impl RegistryError {
    #[must_use]
    pub fn duplicate(key: impl Into<String>) -> Self {
        Self::Duplicate { key: key.into() }
    }

    #[must_use]
    pub fn type_mismatch(key: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
        }
    }

    #[must_use]
    pub fn creation(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Creation {
            key: key.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
