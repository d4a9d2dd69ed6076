// Filesystem-backed core of the labeling notebook: resolves keys below the
// configured root, lists images, stores sidecar data and runs plugins.

pub mod directory_lister;
pub mod error;
pub mod image_data_store;
pub mod path_resolver;
pub mod plugin_invoker;

pub use error::{NotebookError, NotebookResult};
pub use plugin_invoker::ApplyOutcome;

use crate::models::{FileEntry, ImageData};
use crate::plugins::PluginRegistry;
use std::path::{Path, PathBuf};

/// The image root directory and the plugins available to run against it.
#[derive(Debug)]
pub struct Notebook {
    root_dir: PathBuf,
    plugins: PluginRegistry,
}

impl Notebook {
    pub fn new(root_dir: impl Into<PathBuf>, plugins: PluginRegistry) -> Self {
        Self {
            root_dir: root_dir.into(),
            plugins,
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    /// Walks the directory on the blocking thread pool.
    pub async fn list_files(&self, key: &str) -> NotebookResult<Vec<FileEntry>> {
        let root_dir = self.root_dir.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || directory_lister::list_directory(&root_dir, &key))
            .await
            .map_err(|e| NotebookError::Storage {
                path: self.root_dir.clone(),
                source: std::io::Error::other(e),
            })?
    }

    pub async fn get_image(&self, key: &str) -> NotebookResult<image_data_store::ImageFile> {
        image_data_store::get_image(&self.root_dir, key).await
    }

    pub async fn get_image_data(&self, key: &str) -> NotebookResult<ImageData> {
        image_data_store::get_image_data(&self.root_dir, key).await
    }

    pub async fn put_image_data(&self, key: &str, data: ImageData) -> NotebookResult<ImageData> {
        image_data_store::put_image_data(&self.root_dir, key, data).await
    }

    pub async fn apply_plugin(&self, plugin_name: &str, key: &str) -> NotebookResult<ApplyOutcome> {
        plugin_invoker::apply_plugin(&self.plugins, plugin_name, &self.root_dir, key).await
    }
}
