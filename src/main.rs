// Main entry point for the labeling-notebook server.
// Parses the configuration, builds the plugin registry and the Axum router,
// and serves the image root over HTTP until a shutdown signal arrives.

mod models;
mod notebook;
mod plugins;
mod shutdown_signal;
mod web;

use clap::Parser;
use notebook::Notebook;
use plugins::PluginRegistry;
use shutdown_signal::shutdown_signal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

/// Command line arguments for labeling-notebook
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct AppConfig {
    /// Root directory for browsing images.
    #[arg(env = "LABELING_NOTEBOOK_ROOT", default_value = ".")]
    root: PathBuf,

    /// Hostname/IP to bind the server to.
    /// If this option is specified without value, it will default to "*", meaning the server will listen on all interfaces.
    #[arg(long, env = "LABELING_NOTEBOOK_HOST", default_value = "127.0.0.1", num_args = 0..=1, default_missing_value = "*")]
    host: String,

    /// Port number to listen on.
    #[arg(short, long, env = "LABELING_NOTEBOOK_PORT", default_value_t = 9888)]
    port: u16,

    /// Plugins to enable. Defaults to every built-in plugin.
    #[arg(long = "plugin", env = "LABELING_NOTEBOOK_PLUGINS", value_delimiter = ',')]
    plugins: Vec<String>,

    /// Log at DEBUG level instead of INFO.
    #[arg(long, env = "LABELING_NOTEBOOK_DEBUG", action = clap::ArgAction::SetTrue)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    // Parse command line args and environment variables
    let config = AppConfig::parse();

    tracing_subscriber::fmt()
        .with_max_level(if config.debug { Level::DEBUG } else { Level::INFO })
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting labeling-notebook...");

    let root_dir = match std::fs::canonicalize(&config.root) {
        Ok(path) if path.is_dir() => path,
        Ok(path) => {
            tracing::error!("FATAL: Root {:?} is not a directory", path);
            eprintln!("FATAL: Root {:?} is not a directory. Exiting.", path);
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("FATAL: Cannot open root {:?}: {}", config.root, e);
            eprintln!("FATAL: Cannot open root {:?}: {}. Exiting.", config.root, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Image root set to: {}", root_dir.display());

    let plugin_registry = if config.plugins.is_empty() {
        PluginRegistry::with_builtins()
    } else {
        PluginRegistry::from_names(config.plugins.as_slice()).unwrap_or_else(|err| {
            tracing::error!("FATAL: Failed to configure plugins: {}", err);
            eprintln!("FATAL: {}. Exiting.", err);
            std::process::exit(1);
        })
    };
    tracing::info!(
        "Plugin registry initialized with {} plugin(s): {}",
        plugin_registry.len(),
        plugin_registry.names().collect::<Vec<_>>().join(", ")
    );
    if plugin_registry.is_empty() {
        tracing::warn!("No plugins are enabled. Plugin endpoints will always return 404.");
    }

    let notebook = Arc::new(Notebook::new(root_dir, plugin_registry));
    let app = web::create_app(notebook.clone());
    tracing::info!("Axum router configured.");

    // --- Start HTTP Server ---
    let listener = match web::create_listener(&config.host, config.port).await {
        Ok((addr, l)) => {
            tracing::info!("Server successfully bound. Listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("FATAL: Failed to bind server: {}", e);
            eprintln!("FATAL: Could not bind server. Error: {}. Exiting.", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server run error: {}", e);
        eprintln!("ERROR: Server shut down unexpectedly. Error: {}", e);
    }

    tracing::info!(
        "labeling-notebook serving {} has shut down.",
        notebook.root_dir().display()
    );
}
