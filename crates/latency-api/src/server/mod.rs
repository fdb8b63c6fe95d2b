pub mod handler;
pub mod middleware;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    routing::{MethodRouter, get, post},
};
use latency_stats::Dataset;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
};
use tracing::info;

/// Shared, read-only request state
#[derive(Debug, Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub default_threshold_ms: f64,
}

impl AppState {
    pub fn new(dataset: Dataset, default_threshold_ms: f64) -> Self {
        Self {
            dataset: Arc::new(dataset),
            default_threshold_ms,
        }
    }
}

/// Build the API router.
///
/// | Method | Path           | Description                   |
/// |--------|----------------|-------------------------------|
/// | `GET`  | `/`            | Liveness and record count     |
/// | `POST` | `/api/latency` | Per-region latency statistics |
/// | `POST` | `/api/`        | Alias of `/api/latency`       |
///
/// `OPTIONS` on any path is answered by the CORS layer before routing.
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    let latency_route: MethodRouter<AppState> =
        post(handler::latency_stats).fallback(handler::method_not_allowed);

    let routes = Router::new()
        .route("/", get(handler::index).fallback(handler::method_not_allowed))
        .route("/api/latency", latency_route.clone())
        .route("/api/", latency_route)
        .fallback(handler::not_found);

    with_layers(routes, max_body_bytes).with_state(state)
}

/// Wrap `routes` in the body limit, panic recovery, request tracking and CORS layers.
pub fn with_layers<S>(routes: Router<S>, max_body_bytes: usize) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    routes
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(axum::middleware::from_fn(middleware::track_requests))
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Serve the API on `addr` until `shutdown` is cancelled.
pub async fn serve(
    addr: SocketAddr,
    router: Router,
    shutdown: CancellationToken,
) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!(%addr, "latency api listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("Server error")?;

    info!("latency api stopped");

    Ok(())
}
