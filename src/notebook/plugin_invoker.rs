// Runs a registered plugin against one image and persists what it returns.

use super::error::{NotebookError, NotebookResult};
use super::image_data_store::{is_file, read_image_data, write_image_data};
use super::path_resolver::resolve;
use crate::models::ImageData;
use crate::plugins::PluginRegistry;
use std::path::Path;
use tracing::{debug, info};

/// What a plugin run did to the image's sidecar.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    // The plugin returned data, which replaced the sidecar contents.
    Written(ImageData),
    // The plugin returned nothing; the sidecar was left untouched.
    Unchanged,
}

pub async fn apply_plugin(
    plugins: &PluginRegistry,
    plugin_name: &str,
    root_dir: &Path,
    key: &str,
) -> NotebookResult<ApplyOutcome> {
    let plugin = plugins
        .get(plugin_name)
        .ok_or_else(|| NotebookError::PluginNotFound(plugin_name.to_string()))?;

    let resolved = resolve(root_dir, key)?;
    if !is_file(&resolved.absolute_path).await {
        return Err(NotebookError::ImageNotFound(key.to_string()));
    }

    let current_data = if is_file(&resolved.data_path).await {
        Some(read_image_data(&resolved.data_path).await?)
    } else {
        None
    };
    debug!(
        "Applying plugin '{}' to {:?} (existing data: {})",
        plugin_name,
        resolved.absolute_path,
        current_data.is_some()
    );

    let image_path = resolved.absolute_path.clone();
    let output = tokio::task::spawn_blocking(move || plugin.apply(&image_path, current_data))
        .await
        .map_err(|e| NotebookError::PluginFailed {
            plugin: plugin_name.to_string(),
            details: format!("Plugin task failed: {}", e),
        })?
        .map_err(|e| NotebookError::PluginFailed {
            plugin: plugin_name.to_string(),
            details: e.to_string(),
        })?;

    match output {
        Some(data) => {
            write_image_data(&resolved.data_path, &data).await?;
            info!("Plugin '{}' updated image data of {:?}", plugin_name, key);
            Ok(ApplyOutcome::Written(data))
        }
        None => {
            info!("Plugin '{}' left image data of {:?} unchanged", plugin_name, key);
            Ok(ApplyOutcome::Unchanged)
        }
    }
}
