// Records the pixel dimensions and format of an image in its sidecar data.

use super::{Plugin, PluginError};
use crate::models::{ImageData, PluginInfo};
use image::ImageReader;
use serde_json::json;
use std::path::Path;

pub struct ImageInfoPlugin;

impl Plugin for ImageInfoPlugin {
    fn info(&self, detailed: bool) -> PluginInfo {
        let mut extra = serde_json::Map::new();
        if detailed {
            extra.insert("output_field".to_string(), json!("image_info"));
            extra.insert("supported_formats".to_string(), json!(["jpeg", "png"]));
        }

        PluginInfo {
            name: "Image Info".to_string(),
            description: "Stores the image width, height and format in the image data".to_string(),
            is_detailed: detailed,
            extra,
        }
    }

    fn apply(
        &self,
        image_path: &Path,
        image_data: Option<ImageData>,
    ) -> Result<Option<ImageData>, PluginError> {
        // Only the header is decoded.
        let reader = ImageReader::open(image_path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| PluginError(format!("Failed to open image: {}", e)))?;
        let format = reader
            .format()
            .map(|format| format!("{:?}", format).to_lowercase());
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| PluginError(format!("Failed to read image dimensions: {}", e)))?;

        let mut updated = match image_data {
            Some(ImageData::Object(map)) => map,
            Some(_) | None => Default::default(),
        };
        updated.insert(
            "image_info".to_string(),
            json!({
                "width": width,
                "height": height,
                "format": format,
            }),
        );

        Ok(Some(ImageData::Object(updated)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_records_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        image::RgbImage::new(3, 2).save(&path).unwrap();

        let output = ImageInfoPlugin
            .apply(&path, Some(json!({ "tags": ["x"] })))
            .unwrap()
            .unwrap();
        assert_eq!(
            output["image_info"],
            json!({ "width": 3, "height": 2, "format": "png" })
        );
        assert_eq!(output["tags"], json!(["x"]));
    }

    #[test]
    fn test_apply_fails_on_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(ImageInfoPlugin.apply(&path, None).is_err());
    }

    #[test]
    fn test_detailed_info_has_extra_fields() {
        assert!(ImageInfoPlugin.info(false).extra.is_empty());
        assert_eq!(
            ImageInfoPlugin.info(true).extra["output_field"],
            json!("image_info")
        );
    }
}
