use std::path::{Path, PathBuf};

use {comet_common::FromMessage, thiserror::Error};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error("unsupported config format for {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("{message}")]
    Message { message: String },
}

impl ConfigError {
    #[must_use]
    pub fn unsupported_format(path: &Path) -> Self {
        Self::UnsupportedFormat {
            path: path.to_path_buf(),
        }
    }

    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

impl FromMessage for ConfigError {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Error = ConfigError;
pub type Result<T> = std::result::Result<T, ConfigError>;

comet_common::impl_context!();
