use crate::config::ServerConfig;
use crate::signaling::{Relay, ws_handler};
use crate::upload::{CaptureStore, upload_handler};
use axum::extract::{DefaultBodyLimit, FromRef};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub relay: Relay,
    pub captures: Arc<dyn CaptureStore>,
}

impl FromRef<AppState> for Relay {
    fn from_ref(state: &AppState) -> Self {
        state.relay.clone()
    }
}

impl FromRef<AppState> for Arc<dyn CaptureStore> {
    fn from_ref(state: &AppState) -> Self {
        state.captures.clone()
    }
}

/// Routes: `/ws` signaling, `/upload` captures, `/captures/*` stored files,
/// `/health` probe.
pub fn build_router(state: AppState, config: &ServerConfig, captures_dir: &Path) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route(
            "/upload",
            post(upload_handler).layer(DefaultBodyLimit::max(config.upload.max_upload_bytes)),
        )
        .route("/health", get(|| async { "ok" }))
        .nest_service("/captures", ServeDir::new(captures_dir))
        .layer(cors_layer(config.allowed_origin.as_deref()))
        .with_state(state)
}

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let origin = match allowed_origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            warn!("Ignoring invalid CORS origin: {}", e);
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
