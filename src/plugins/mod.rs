// Registry of the plugins that can post-process an image and produce new
// sidecar data. Plugins are compiled in and selected by name at startup.

mod example;
mod image_info;

pub use example::ExamplePlugin;
pub use image_info::ImageInfoPlugin;

use crate::models::{ImageData, PluginInfo};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Error reported by a plugin while processing an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PluginError(pub String);

/// A capability that inspects an image and optionally returns new image data.
///
/// `apply` runs on the blocking thread pool, so implementations may do
/// synchronous file I/O and decoding.
pub trait Plugin: Send + Sync {
    fn info(&self, detailed: bool) -> PluginInfo;

    /// Returns the data to store for the image, or `None` to leave the
    /// sidecar untouched. Returned data replaces the existing sidecar.
    fn apply(
        &self,
        image_path: &Path,
        image_data: Option<ImageData>,
    ) -> Result<Option<ImageData>, PluginError>;
}

/// Names of the plugins shipped with the server.
pub const BUILTIN_PLUGIN_NAMES: [&str; 2] = ["example", "image_info"];

fn builtin_plugin(name: &str) -> Option<Arc<dyn Plugin>> {
    match name {
        "example" => Some(Arc::new(ExamplePlugin)),
        "image_info" => Some(Arc::new(ImageInfoPlugin)),
        _ => None,
    }
}

#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in plugin.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for name in BUILTIN_PLUGIN_NAMES {
            if let Some(plugin) = builtin_plugin(name) {
                registry.register(name, plugin);
            }
        }
        registry
    }

    /// Registry holding only the named built-ins. Fails on the first unknown name.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        let mut registry = Self::new();
        for name in names {
            let name = name.as_ref().trim();
            let plugin = builtin_plugin(name).ok_or_else(|| {
                format!(
                    "Unknown plugin '{}'. Available plugins: {}",
                    name,
                    BUILTIN_PLUGIN_NAMES.join(", ")
                )
            })?;
            registry.register(name, plugin);
        }
        Ok(registry)
    }

    pub fn register(&mut self, name: impl Into<String>, plugin: Arc<dyn Plugin>) {
        let name = name.into();
        if self.plugins.insert(name.clone(), plugin).is_some() {
            tracing::warn!("Plugin '{}' registered twice, keeping the last one", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Summary info of every plugin, keyed by registered name.
    pub fn list_info(&self) -> BTreeMap<String, PluginInfo> {
        self.plugins
            .iter()
            .map(|(name, plugin)| (name.clone(), plugin.info(false)))
            .collect()
    }

    /// Detailed info of one plugin.
    pub fn plugin_info(&self, name: &str) -> Option<PluginInfo> {
        self.plugins.get(name).map(|plugin| plugin.info(true))
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.plugins.keys()).finish()
    }
}
