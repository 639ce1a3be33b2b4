mod config;
mod enhance;
mod errors;
mod layout;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::enhance::{DisabledEnhancer, Enhancer, LlmEnhancer};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting onepage v{}", env!("CARGO_PKG_VERSION"));

    let enhancer: Arc<dyn Enhancer> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("Enhancement enabled (model: {})", llm_client::MODEL);
            Arc::new(LlmEnhancer(llm))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; /api/v1/enhance will return 503");
            Arc::new(DisabledEnhancer)
        }
    };
    info!(
        backend = %config.default_backend,
        compress = config.pdf_compress,
        "Render defaults"
    );

    let state = AppState {
        config: config.clone(),
        enhancer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
