use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api;
use crate::engine::Engine;

/// Full application: the API nested under `/api` with permissive CORS
pub fn app(engine: Arc<Engine>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(engine))
        .layer(cors)
}

pub async fn run(port: u16, engine: Arc<Engine>) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", port);
    axum::serve(listener, app(engine))
        .await
        .context("Web server terminated")?;
    Ok(())
}
