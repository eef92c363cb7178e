pub mod error;
pub mod routes;
pub mod state;
pub mod views;

use axum::Router;
use futbot_brokers_crypto::{ClientConfig, Credentials};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::WebError;
pub use state::{AppState, OrderRecord};

/// Build the Axum application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::page_routes())
        .nest("/api", routes::api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the web server. Missing credentials are reported per request rather
/// than failing startup.
pub async fn start_server(
    bind_addr: &str,
    config: ClientConfig,
    credentials: Option<Credentials>,
) -> anyhow::Result<()> {
    if credentials.is_none() {
        tracing::warn!("No API credentials configured; exchange calls will fail");
    }
    let app = build_router(AppState::new(config, credentials));
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Web UI listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
