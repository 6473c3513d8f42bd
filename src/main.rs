//! WebSearch-RS: a pluggable search-and-extraction dispatcher
//!
//! This is the main entry point for the application.

use anyhow::Result;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;
use websearch_rs::{
    config,
    engines::EngineLoader,
    network::HttpClient,
    web::{create_router, AppState},
    SearchListener,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting WebSearch-RS v{}", websearch_rs::VERSION);

    // Load configuration
    let settings = config::load()?;

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    // Register engines before accepting traffic
    let registry = EngineLoader::load(&settings, &client)?;
    let listener = SearchListener::new(registry);
    info!("Serving backends: {}", listener.backends().join(", "));

    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    let state = AppState::new(listener);
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let tcp = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(tcp, app).await?;

    Ok(())
}
