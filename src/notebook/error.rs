// Error types raised by the notebook core (path resolution, listing,
// sidecar storage and plugin invocation).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Image not found: {0}")]
    ImageNotFound(String),

    #[error("Image data not found: {0}")]
    ImageDataNotFound(String),

    #[error("Plugin not found: {0}")]
    PluginNotFound(String),

    // The key would resolve to a path outside the configured root.
    #[error("Path escapes the notebook root: {0}")]
    OutsideRoot(String),

    #[error("{0}")]
    Validation(String),

    #[error("Image data at {} is not valid JSON: {source}", .path.display())]
    MalformedData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to access {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Plugin '{plugin}' failed: {details}")]
    PluginFailed { plugin: String, details: String },
}

impl NotebookError {
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}

pub type NotebookResult<T> = Result<T, NotebookError>;
