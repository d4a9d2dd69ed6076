// Web server module
// Handles the HTTP API endpoints for browsing images, sidecar data and plugins

mod app;
mod error;
mod handlers;
mod listeners;
mod models;

pub use app::create_app;
pub use listeners::create_listener;

use crate::notebook::Notebook;
use std::sync::Arc;

// Maximum allowed size of an image data (sidecar JSON) request body
pub const MAX_IMAGE_DATA_SIZE_BYTES: usize = 16 * 1024 * 1024; // 16MB

pub type SharedNotebook = Arc<Notebook>;
