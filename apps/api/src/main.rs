mod analysis;
mod config;
mod dashboard;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod maintenance;
mod models;
mod routes;
mod shutdown;
mod skills;
mod state;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LlmProviderKind};
use crate::db::create_pool;
use crate::llm_client::{AnthropicProvider, LlmProvider, MockProvider};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview Trainer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.database_max_connections).await?;

    // Initialize LLM provider
    let llm = build_provider(&config)?;
    info!("LLM provider initialized ({})", llm.name());

    // Expired analysis cache rows are purged in the background
    maintenance::spawn_cache_cleanup(db.clone(), config.cache_cleanup_interval_secs);

    let cors = build_cors(&config.cors_allowed_origins);

    let state = AppState {
        db,
        llm,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn build_provider(config: &Config) -> Result<Arc<dyn LlmProvider>> {
    Ok(match config.llm_provider {
        LlmProviderKind::Anthropic => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY must be set when LLM_PROVIDER=anthropic")?;
            info!("Using Anthropic model {}", config.anthropic_model);
            Arc::new(AnthropicProvider::new(
                api_key,
                config.anthropic_model.clone(),
                config.anthropic_max_tokens,
            )?)
        }
        LlmProviderKind::Mock => Arc::new(MockProvider::new(Duration::from_millis(
            config.mock_delay_ms,
        ))),
    })
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // A wildcard cannot sit in an origin list, it replaces it.
    if origins.iter().any(|o| o == "*") {
        if origins.len() > 1 {
            warn!("CORS_ALLOWED_ORIGINS contains '*', other origins are ignored");
        }
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{o}'");
                None
            }
        })
        .collect();

    layer.allow_origin(allowed)
}
