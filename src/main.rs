use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ideahub_core::config::{api_url_from_env_value, secs_from_env_value};
use ideahub_core::constants::DEFAULT_REQUEST_TIMEOUT;
use ideahub_core::{CoreConfig, HttpIdeaApi, IdeaService};
use ideahub_web::{AppState, router};

/// Main entry point for the IdeaHub web application
///
/// Serves the server-rendered frontend, talking to the remote idea API for all data.
///
/// # Environment Variables
/// - `IDEAHUB_ADDR`: listen address (default: "0.0.0.0:3000")
/// - `IDEAHUB_API_URL`: base URL of the idea API (default: "http://localhost:8000/api")
/// - `IDEAHUB_REQUEST_TIMEOUT_SECS`: timeout for each API request (default: 30)
/// - `IDEAHUB_STALE_SECS`: age after which cached reads are refetched (default: never)
///
/// # Errors
/// Returns an error if:
/// - a configuration value is invalid,
/// - the templates fail to compile, or
/// - the listen address cannot be bound.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ideahub=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("IDEAHUB_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let api_url = api_url_from_env_value(std::env::var("IDEAHUB_API_URL").ok())?;
    let request_timeout = secs_from_env_value(
        "IDEAHUB_REQUEST_TIMEOUT_SECS",
        std::env::var("IDEAHUB_REQUEST_TIMEOUT_SECS").ok(),
    )?
    .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
    let stale_time =
        secs_from_env_value("IDEAHUB_STALE_SECS", std::env::var("IDEAHUB_STALE_SECS").ok())?;

    let cfg = CoreConfig::new(api_url, request_timeout, stale_time)?;
    let ideas = IdeaService::new(HttpIdeaApi::new(&cfg)?, &cfg);
    let app = router(AppState::new(ideas)?);

    tracing::info!("++ Starting IdeaHub on {} (api: {})", addr, cfg.api_base_url());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("-- Shutting down IdeaHub");
}
