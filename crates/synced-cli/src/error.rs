//! Error types for synced-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from synced-core
    #[error(transparent)]
    Core(#[from] synced_core::Error),

    /// Error from synced-git
    #[error(transparent)]
    Git(#[from] synced_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Stable code for errors raised by the sync engine.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Core(e) => Some(e.code().as_str()),
            _ => None,
        }
    }
}
