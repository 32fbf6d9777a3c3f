//! Panel HTTP server
//!
//! Serves the rendered dashboard, the login entry page, and the Prometheus
//! exposition endpoint. The dashboard handler is the place where the
//! gateway's `AuthExpired` sentinel turns into an actual navigation: a
//! redirect to the configured entry page.

use crate::config::PanelConfig;
use crate::metrics;
use crate::stats::{DashboardLoad, StatsClient};
use crate::view::DashboardView;
use anyhow::Result;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Clone)]
struct AppState {
    stats: Arc<StatsClient>,
    view: Arc<Mutex<DashboardView>>,
    entry_path: String,
    prometheus_enabled: bool,
}

/// Build the panel application
pub fn app(config: &PanelConfig, stats: StatsClient) -> Router {
    let state = AppState {
        stats: Arc::new(stats),
        view: Arc::new(Mutex::new(DashboardView::new())),
        entry_path: config.server.entry_path.clone(),
        prometheus_enabled: config.monitoring.prometheus_enabled,
    };

    Router::new()
        .route("/", get(dashboard))
        .route("/index.html", get(entry))
        .route("/metrics", get(metrics_text))
        .with_state(state)
}

/// Start the panel server
pub async fn start_server(config: PanelConfig, stats: StatsClient) -> Result<()> {
    let bind = config.server.bind;
    let router = app(&config, stats);

    info!("Panel listening on {}", bind);
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

async fn dashboard(State(state): State<AppState>) -> Response {
    match state.stats.load_dashboard().await {
        DashboardLoad::Ready(data) => {
            let mut view = state.view.lock().await;
            Html(view.render(&data)).into_response()
        }
        DashboardLoad::AuthExpired => Redirect::to(&state.entry_path).into_response(),
    }
}

// Login itself lives in the main application; the panel only parks expired
// sessions here.
async fn entry() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Sign In Required</title>
    <style>body{font-family:sans-serif;background:#1a1b1e;color:#fff;padding:20px}.card{background:#25262b;padding:20px;margin-bottom:20px;border-radius:8px}</style>
</head>
<body>
    <div class="card">
        <h1>Sign In Required</h1>
        <p>Your session has ended. Sign in again to open the statistics panel.</p>
    </div>
</body>
</html>"#,
    )
}

async fn metrics_text(State(state): State<AppState>) -> Response {
    if !state.prometheus_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }
    metrics::gather().into_response()
}
