// Minimal working plugin used for testing the plugin round trip.

use super::{Plugin, PluginError};
use crate::models::{ImageData, PluginInfo};
use serde_json::json;
use std::path::Path;

pub struct ExamplePlugin;

impl Plugin for ExamplePlugin {
    fn info(&self, detailed: bool) -> PluginInfo {
        PluginInfo {
            name: "Example Plugin".to_string(),
            description: "Example plugin used for testing".to_string(),
            is_detailed: detailed,
            extra: Default::default(),
        }
    }

    fn apply(
        &self,
        image_path: &Path,
        image_data: Option<ImageData>,
    ) -> Result<Option<ImageData>, PluginError> {
        let mut updated = match image_data {
            Some(ImageData::Object(map)) => map,
            Some(other) => {
                return Err(PluginError(format!(
                    "Expected image data to be a JSON object, got {}",
                    other
                )));
            }
            None => Default::default(),
        };

        updated.insert(
            "example_response".to_string(),
            json!({
                "message": "Applied example plugin",
                "input": {
                    "image_path": image_path.to_string_lossy(),
                },
            }),
        );
        Ok(Some(ImageData::Object(updated)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_without_existing_data() {
        let output = ExamplePlugin
            .apply(Path::new("/data/image.jpg"), None)
            .unwrap()
            .unwrap();
        assert_eq!(
            output,
            json!({
                "example_response": {
                    "message": "Applied example plugin",
                    "input": { "image_path": "/data/image.jpg" },
                }
            })
        );
    }

    #[test]
    fn test_apply_keeps_existing_fields() {
        let output = ExamplePlugin
            .apply(Path::new("a.jpg"), Some(json!({ "tags": ["cat"] })))
            .unwrap()
            .unwrap();
        assert_eq!(output["tags"], json!(["cat"]));
        assert_eq!(output["example_response"]["message"], "Applied example plugin");
    }

    #[test]
    fn test_apply_rejects_non_object_data() {
        assert!(ExamplePlugin.apply(Path::new("a.jpg"), Some(json!([1]))).is_err());
    }
}
