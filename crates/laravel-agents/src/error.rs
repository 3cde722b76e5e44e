//! Error types for publish operations.

use std::path::PathBuf;

/// Errors that can occur while publishing or inspecting a bundle.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The source tree to publish from does not exist.
    #[error("source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The destination already exists and the publish mode forbids merging.
    #[error("destination already exists: {} (use --force to overwrite)", .0.display())]
    DestinationExists(PathBuf),

    /// A filesystem operation failed on a specific path.
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        /// What was being attempted (e.g., "write", "create directory").
        action: &'static str,
        /// The path the operation was applied to.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Walking a source directory failed.
    #[error("failed to walk source directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A source path would escape the destination root.
    #[error("invalid path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// A required location could not be determined.
    #[error("not found: {0}")]
    NotFound(String),

    /// YAML parsing failed.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

impl Error {
    /// Wraps an I/O error with the action and path it occurred on.
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// A specialized Result type for publish operations.
pub type Result<T> = std::result::Result<T, Error>;
