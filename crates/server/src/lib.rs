//! HTTP boundary for the postgrade pipeline.
//!
//! Exposes `POST /api/blog/fetch` and `GET /health`. Structure analysis is
//! left to the caller, which re-runs it on every edit.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod routes;

use postgrade_core::{Pipeline, PipelineConfig};

pub use config::ServerConfig;
pub use handlers::AppState;
pub use routes::build_router;

/// Router wired with a pipeline built from `config`.
pub fn app(config: &ServerConfig) -> anyhow::Result<axum::Router> {
    let pipeline = Pipeline::with_config(PipelineConfig::builder().timeout(config.fetch_timeout_secs).build());
    build_router(AppState::new(pipeline), config)
}

/// Binds `config.addr()` and serves until `shutdown` resolves.
pub async fn serve(
    config: ServerConfig, shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = config.addr()?;
    let router = app(&config)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {addr}: {err}"))?;
    tracing::info!(%addr, frontend = %config.frontend_url, "listening");

    axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;
    Ok(())
}
