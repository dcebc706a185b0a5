//! Error types for synced-core

use std::fmt;
use std::path::PathBuf;

/// Result type for synced-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    SyncConfigMissing,
    RepoDiverged,
    RepoPrivateRequired,
    RepoVisibilityError,
    SyncCommandError,
    PathUnsafe,
    ManifestInvalid,
    IoError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SyncConfigMissing => "sync_config_missing",
            Self::RepoDiverged => "repo_diverged",
            Self::RepoPrivateRequired => "repo_private_required",
            Self::RepoVisibilityError => "repo_visibility_error",
            Self::SyncCommandError => "sync_command_error",
            Self::PathUnsafe => "path_unsafe",
            Self::ManifestInvalid => "manifest_invalid",
            Self::IoError => "io_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a manifest `repoPath` was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSafetyKind {
    /// Rooted path, drive letter, UNC share or drive-qualified segment
    AbsolutePath,
    /// Resolves outside the manifest's subtree
    EscapesRoot,
}

impl fmt::Display for PathSafetyKind {
    // Callers match on these phrases; keep the wording stable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AbsolutePath => f.write_str("absolute paths are not allowed"),
            Self::EscapesRoot => f.write_str("path escapes repository root"),
        }
    }
}

/// A manifest entry whose repository path failed containment checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid repoPath '{path}': {kind} (allowed subtree: {subtree})")]
pub struct PathSafetyError {
    pub kind: PathSafetyKind,
    /// The offending path exactly as read from the manifest
    pub path: String,
    /// Repository-relative subtree the path had to stay inside
    pub subtree: String,
}

/// Errors that can occur in synced-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The user-level sync configuration file is absent
    #[error("Sync configuration not found at {path}")]
    ConfigMissing { path: PathBuf },

    /// Local and remote repository histories disagree
    #[error("Sync repository has diverged from its remote: {message}")]
    RepoDiverged { message: String },

    /// The target repository must be private but is not
    #[error("Sync repository must be private: {message}")]
    RepoPrivateRequired { message: String },

    /// Repository visibility could not be determined or changed
    #[error("Could not determine repository visibility: {message}")]
    RepoVisibility { message: String },

    /// An underlying command invocation failed
    #[error("Sync command failed: {message}")]
    Command { message: String },

    #[error(transparent)]
    PathSafety(#[from] PathSafetyError),

    /// An extra manifest exists but cannot be parsed
    #[error("Invalid extra manifest at {path}: {message}")]
    ManifestInvalid { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from synced-fs
    #[error(transparent)]
    Fs(#[from] synced_fs::Error),

    /// Git error from synced-git
    #[error(transparent)]
    Git(#[from] synced_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The stable code callers should match on instead of message text.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ConfigMissing { .. } => ErrorCode::SyncConfigMissing,
            Self::RepoDiverged { .. } => ErrorCode::RepoDiverged,
            Self::RepoPrivateRequired { .. } => ErrorCode::RepoPrivateRequired,
            Self::RepoVisibility { .. } => ErrorCode::RepoVisibilityError,
            Self::Command { .. } | Self::Git(_) => ErrorCode::SyncCommandError,
            Self::PathSafety(_) | Self::Fs(synced_fs::Error::SymlinkInPath { .. }) => {
                ErrorCode::PathUnsafe
            }
            Self::ManifestInvalid { .. } => ErrorCode::ManifestInvalid,
            Self::Fs(_) | Self::Io(_) | Self::Json(_) => ErrorCode::IoError,
        }
    }

    /// The path-safety payload, when this is a containment failure.
    pub fn path_safety(&self) -> Option<&PathSafetyError> {
        match self {
            Self::PathSafety(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_strings() {
        let cases = [
            (
                Error::ConfigMissing {
                    path: PathBuf::from("/x/opencode-synced.jsonc"),
                },
                "sync_config_missing",
            ),
            (Error::RepoDiverged { message: "m".into() }, "repo_diverged"),
            (
                Error::RepoPrivateRequired { message: "m".into() },
                "repo_private_required",
            ),
            (
                Error::RepoVisibility { message: "m".into() },
                "repo_visibility_error",
            ),
            (Error::Command { message: "m".into() }, "sync_command_error"),
        ];

        for (error, code) in cases {
            assert_eq!(error.code().as_str(), code);
        }
    }

    #[test]
    fn path_safety_messages_keep_compatible_wording() {
        let absolute = Error::from(PathSafetyError {
            kind: PathSafetyKind::AbsolutePath,
            path: "/etc/passwd".into(),
            subtree: "config/extra".into(),
        });
        let escape = Error::from(PathSafetyError {
            kind: PathSafetyKind::EscapesRoot,
            path: "../../etc/passwd".into(),
            subtree: "config/extra".into(),
        });

        assert!(absolute.to_string().contains("absolute paths are not allowed"));
        assert!(escape.to_string().contains("path escapes repository root"));
        assert_eq!(
            escape.path_safety().map(|e| e.kind),
            Some(PathSafetyKind::EscapesRoot)
        );
    }

    #[test]
    fn config_missing_displays_path() {
        let error = Error::ConfigMissing {
            path: PathBuf::from("/path/to/opencode-synced.jsonc"),
        };
        assert!(error.to_string().contains("/path/to/opencode-synced.jsonc"));
    }
}
