use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use common_http_errors::ApiEnvelope;
use common_security::{menu_for, MenuItem, RouteDecision, RoutePolicy};
use common_session::{Role, SessionGate};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ScreenView {
    pub screen: &'static str,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub menu: &'static [MenuItem],
}

pub async fn open_landing(
    State(gate): State<SessionGate>,
    State(policy): State<Arc<RoutePolicy>>,
) -> Response {
    resolve(&gate, &policy, policy.landing())
}

pub async fn open_screen(
    State(gate): State<SessionGate>,
    State(policy): State<Arc<RoutePolicy>>,
    Path(path): Path<String>,
) -> Response {
    resolve(&gate, &policy, &format!("/{path}"))
}

// The role is read once per request; a redirect never carries screen data.
fn resolve(gate: &SessionGate, policy: &RoutePolicy, path: &str) -> Response {
    let role = gate.role();
    match policy.decide(role.as_ref(), path) {
        RouteDecision::Render { role, path } => ApiEnvelope::ok(ScreenView {
            screen: "page",
            path,
            menu: menu_for(&role),
            role: Some(role),
        })
        .into_response(),
        RouteDecision::Landing => ApiEnvelope::ok(ScreenView {
            screen: "landing",
            path: policy.landing().to_string(),
            role: None,
            menu: &[],
        })
        .into_response(),
        RouteDecision::Redirect { to } => Redirect::to(&screen_url(&to)).into_response(),
    }
}

fn screen_url(path: &str) -> String {
    if path == "/" {
        "/screens".to_string()
    } else {
        format!("/screens{path}")
    }
}
