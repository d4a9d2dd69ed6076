// API handlers for the web server

use super::{SharedNotebook, error::ApiError, models::*};
use crate::models::{FileEntry, ImageData, PluginInfo};
use crate::notebook::{ApplyOutcome, NotebookError};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::{TypedHeader, extract::WithRejection};
use headers::ContentType;
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

// --- GET /api/files?path=<key> ---
// Lists images and subdirectories below a directory
pub async fn list_files(
    State(notebook): State<SharedNotebook>,
    WithRejection(Query(query), _): WithRejection<Query<ListFilesQuery>, ApiError>,
) -> Result<Json<Vec<FileEntry>>, ApiError> {
    debug!("List files request: path={:?}", query.path);
    let entries = notebook.list_files(&query.path).await?;
    Ok(Json(entries))
}

// --- GET /api/files/image/{*key} ---
// Serves the raw image bytes
pub async fn get_image(
    State(notebook): State<SharedNotebook>,
    WithRejection(Path(key), _): WithRejection<Path<String>, ApiError>,
) -> Result<Response, ApiError> {
    debug!("Get image request: key={:?}", key);
    let image = notebook.get_image(&key).await?;
    Ok((TypedHeader(ContentType::from(image.content_type)), image.bytes).into_response())
}

// --- GET /api/files/image_data/{*key} ---
// Returns the sidecar data of an image
pub async fn get_image_data(
    State(notebook): State<SharedNotebook>,
    WithRejection(Path(key), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<ImageData>, ApiError> {
    debug!("Get image data request: key={:?}", key);
    let data = notebook.get_image_data(&key).await?;
    Ok(Json(data))
}

// --- PUT|POST /api/files/image_data/{*key} ---
// Overwrites the sidecar data of an image and echoes it back.
// The body is parsed as JSON whatever the Content-Type says.
pub async fn put_image_data(
    State(notebook): State<SharedNotebook>,
    WithRejection(Path(key), _): WithRejection<Path<String>, ApiError>,
    WithRejection(body, _): WithRejection<Bytes, ApiError>,
) -> Result<Json<ImageData>, ApiError> {
    let data: ImageData = serde_json::from_slice(&body)
        .map_err(|e| NotebookError::Validation(format!("Invalid JSON body: {}", e)))?;

    debug!("Put image data request: key={:?}", key);
    let data = notebook.put_image_data(&key, data).await?;
    Ok(Json(data))
}

// --- GET /api/plugins ---
// Lists all registered plugins by name
pub async fn get_plugins(
    State(notebook): State<SharedNotebook>,
) -> Json<BTreeMap<String, PluginInfo>> {
    Json(notebook.plugins().list_info())
}

// --- GET /api/plugins/{name} ---
// Returns the detailed info of one plugin
pub async fn get_plugin_info(
    State(notebook): State<SharedNotebook>,
    WithRejection(Path(name), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<PluginInfo>, ApiError> {
    notebook
        .plugins()
        .plugin_info(&name)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Plugin not found".to_string()))
}

// --- POST /api/plugins/{name}/apply/{*key} ---
// Runs a plugin against an image and stores the data it returns
pub async fn apply_plugin(
    State(notebook): State<SharedNotebook>,
    WithRejection(Path((name, key)), _): WithRejection<Path<(String, String)>, ApiError>,
) -> Result<Json<ApplyPluginResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    info!(
        "Apply plugin request: plugin={}, key={:?}, request_id={}",
        name, key, request_id
    );

    match notebook.apply_plugin(&name, &key).await? {
        ApplyOutcome::Written(data) => debug!(
            "Apply plugin finished: request_id={}, stored {} top-level field(s)",
            request_id,
            data.as_object().map_or(0, |fields| fields.len())
        ),
        ApplyOutcome::Unchanged => debug!(
            "Apply plugin finished: request_id={}, image data unchanged",
            request_id
        ),
    }

    Ok(Json(ApplyPluginResponse::applied(&name, &key)))
}

// --- Unmatched routes ---
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Method not allowed".to_string())
}
