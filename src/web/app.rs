use super::{MAX_IMAGE_DATA_SIZE_BYTES, SharedNotebook, handlers};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::Level;

pub fn create_app(notebook: SharedNotebook) -> Router {
    // Configure the router with all API endpoints
    Router::new()
        // File browsing and sidecar data
        .route("/api/files", get(handlers::list_files))
        .route("/api/files/image/{*key}", get(handlers::get_image))
        .route(
            "/api/files/image_data/{*key}",
            get(handlers::get_image_data)
                .put(handlers::put_image_data)
                .post(handlers::put_image_data),
        )
        // Plugin discovery and invocation
        .route("/api/plugins", get(handlers::get_plugins))
        .route("/api/plugins/{name}", get(handlers::get_plugin_info))
        .route(
            "/api/plugins/{name}/apply/{*key}",
            post(handlers::apply_plugin),
        )
        // Unmatched paths and methods still answer with the JSON error payload
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        // Apply a layer to limit the maximum size of request bodies
        .layer(DefaultBodyLimit::max(MAX_IMAGE_DATA_SIZE_BYTES))
        // Add CORS layer for broader client compatibility
        .layer(CorsLayer::permissive())
        // Add tracing for HTTP requests and responses
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new().level(Level::INFO)))
        // Provide the shared state
        .with_state(notebook)
}
