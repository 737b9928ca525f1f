use std::sync::Arc;

use axum::body::Body;
use axum::extract::{FromRef, State};
use axum::http::{
    header::{self, ACCEPT, CONTENT_TYPE},
    HeaderValue, Method, StatusCode,
};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use common_http_errors::{ApiError, ApiResult};
use common_observability::GateMetrics;
use common_security::RoutePolicy;
use common_session::SessionGate;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::identity::IdentityProvider;
use crate::screen_handlers::{open_landing, open_screen};
use crate::session_handlers::{current_session, login, logout};

/// Shared application state. The gate is injected here and reaches every
/// handler through the state, never through a global.
#[derive(Clone)]
pub struct AppState {
    pub gate: SessionGate,
    pub policy: Arc<RoutePolicy>,
    pub identity: Arc<dyn IdentityProvider>,
    pub metrics: GateMetrics,
}

impl FromRef<AppState> for SessionGate {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}

impl FromRef<AppState> for Arc<RoutePolicy> {
    fn from_ref(state: &AppState) -> Self {
        state.policy.clone()
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics_endpoint(State(metrics): State<GateMetrics>) -> ApiResult<Response> {
    let text = metrics.render().map_err(|err| ApiError::internal(err, None))?;
    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4"),
        )
        .body(Body::from(text))
        .map_err(|err| ApiError::internal(err, None))
}

impl FromRef<AppState> for GateMetrics {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5173"),
        ]))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE]);

    Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/session", get(current_session).post(login).delete(logout))
        .route("/screens", get(open_landing))
        .route("/screens/*path", get(open_screen))
        .with_state(state)
        .layer(cors)
}
