//! HTTP surface: the metrics route and a small landing page.

use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

use aruba_core::Collector;

use crate::exposition;

#[derive(Clone)]
struct AppState {
    collector: Collector,
    metrics_path: Arc<str>,
}

/// Build the router. Each request to `metrics_path` runs one scrape.
pub fn router(collector: Collector, metrics_path: &str) -> Router {
    let state = AppState {
        collector,
        metrics_path: Arc::from(metrics_path),
    };

    let mut router = Router::new().route(metrics_path, get(metrics));
    if metrics_path != "/" {
        router = router.route("/", get(landing));
    }
    router.with_state(state)
}

async fn metrics(State(state): State<AppState>) -> Response {
    let scrape = state.collector.scrape().await;
    match exposition::render(&scrape) {
        Ok(body) => ([(header::CONTENT_TYPE, exposition::CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!(error = %e, "rendering exposition failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn landing(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html><head><title>Aruba Central Exporter</title></head>\
         <body><h1>Aruba Central Exporter</h1>\
         <p><a href=\"{path}\">Metrics</a></p></body></html>",
        path = state.metrics_path
    ))
}

/// Serve `router` on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
