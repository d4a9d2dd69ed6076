// Defines the data structures shared between the notebook core, the plugins
// and the HTTP API, using Serde for JSON serialization.

use serde::{Deserialize, Serialize};

// Annotation data stored in an image's sidecar file.
// The server never inspects its shape; it is stored and returned as-is.
pub type ImageData = serde_json::Value;

// One entry of a directory listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum FileEntry {
    // An image file with a whitelisted extension.
    Image {
        key: String,
        // File size in bytes.
        size: u64,
        // Modification time in milliseconds since the Unix epoch.
        #[serde(rename = "modified")]
        modified_millis: u64,
    },
    // A descendant directory. `key` is relative to the listing root and ends with '/'.
    // Declared last so untagged deserialization tries the image shape first.
    Directory { key: String },
}

#[cfg(test)]
impl FileEntry {
    pub fn key(&self) -> &str {
        match self {
            FileEntry::Directory { key } | FileEntry::Image { key, .. } => key,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, FileEntry::Directory { .. })
    }
}

// Describes a registered plugin for the /api/plugins endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PluginInfo {
    pub name: String,
    pub description: String,
    // True when the info was requested for a single plugin and may carry extra details.
    pub is_detailed: bool,
    // Plugin-specific fields, embedded directly into the JSON object.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
