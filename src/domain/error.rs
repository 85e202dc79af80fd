//! Configuration error types.

use std::path::PathBuf;

/// Broad classification of a [`ConfigError`].
///
/// Callers that only care whether a config is absent, malformed, or
/// incomplete match on this instead of the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Parse,
    Validation,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("config parse error in {file} at line {line}: {reason}")]
    Parse {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("config parse error in {file}: {reason}")]
    Ini { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    Missing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    Invalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unrecognized config {}", describe_unrecognized(.section, .key.as_deref()))]
    Unrecognized { section: String, key: Option<String> },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn describe_unrecognized(section: &str, key: Option<&str>) -> String {
    match key {
        Some(key) => format!("key [{section}] {key}"),
        None => format!("section [{section}]"),
    }
}

impl ConfigError {
    pub fn missing(section: &str, key: &str) -> Self {
        ConfigError::Missing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }

    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::NotFound { .. } => ErrorKind::NotFound,
            ConfigError::Parse { .. } | ConfigError::Ini { .. } => ErrorKind::Parse,
            ConfigError::Missing { .. }
            | ConfigError::Invalid { .. }
            | ConfigError::Unrecognized { .. } => ErrorKind::Validation,
            ConfigError::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<&ConfigError> for std::process::ExitCode {
    fn from(err: &ConfigError) -> Self {
        let code: u8 = match err.kind() {
            ErrorKind::Io => 1,
            ErrorKind::NotFound => 2,
            ErrorKind::Parse => 3,
            ErrorKind::Validation => 4,
        };
        std::process::ExitCode::from(code)
    }
}
