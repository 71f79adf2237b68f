mod admin;
mod auth;
mod config;
mod credits;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod payments;
mod routes;
mod state;

use anyhow::Result;
use axum::http::{header, HeaderName};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::AuthClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SEOverse API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize identity provider client
    let auth = AuthClient::new(config.auth_url.clone(), config.auth_service_key.clone());
    info!("Auth client initialized");

    // Initialize completion providers
    let llm = LlmClient::new(
        config.gateway_url.clone(),
        config.gateway_api_key.clone(),
        config.gateway_model.clone(),
    );
    info!("Primary LLM client initialized (model: {})", llm.model());

    let trends_llm = LlmClient::new(
        config.trends_url.clone(),
        config.trends_api_key.clone(),
        config.trends_model.clone(),
    );
    info!("Trends LLM client initialized (model: {})", trends_llm.model());

    // Build app state
    let state = AppState {
        db,
        auth,
        llm,
        trends_llm,
    };

    // Browser clients call this API cross-origin; the allow-list matches the
    // headers they actually send.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
