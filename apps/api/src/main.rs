mod analysis;
mod config;
mod documents;
mod errors;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::ResumeAnalyzer;
use crate::config::Config;
use crate::llm_client::{CredentialPool, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_coach_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Coach API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client; only the key count is ever logged
    let credentials = CredentialPool::new(config.gemini_api_keys.clone());
    if credentials.is_empty() {
        warn!("GEMINI_API_KEYS is empty; requests will be sent without an API key");
    }
    let llm = LlmClient::new(&config.gemini_api_base, credentials.clone())?;
    info!(
        "LLM client initialized (model: {}, keys: {})",
        llm_client::MODEL,
        credentials.len()
    );

    let state = AppState {
        analyzer: ResumeAnalyzer::new(Arc::new(llm)),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
