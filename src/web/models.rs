// API-specific request and response bodies for the web server

use serde::{Deserialize, Serialize};

/// Query parameters of GET /api/files
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ListFilesQuery {
    // Directory to list, relative to the notebook root. Missing means the root itself.
    #[serde(default)]
    pub path: String,
}

/// Response to POST /api/plugins/{name}/apply/{*key}
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApplyPluginResponse {
    pub message: String,
}

impl ApplyPluginResponse {
    pub fn applied(plugin_name: &str, key: &str) -> Self {
        Self {
            message: format!(
                "Successfully applied \"{}\" plugin to \"{}\"",
                plugin_name, key
            ),
        }
    }
}
