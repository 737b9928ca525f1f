use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use common_http_errors::{ApiEnvelope, ApiError, ApiResult};
use common_security::{menu_for, route_set, MenuItem};
use common_session::{Role, SessionError, SessionGate};
use serde::Serialize;
use tracing::{info, warn};

use crate::app::AppState;
use crate::identity::{IdentityError, LoginRequest};

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub authenticated: bool,
    pub role: Option<Role>,
    pub home: Option<&'static str>,
    pub menu: &'static [MenuItem],
}

impl SessionView {
    pub fn for_role(role: Option<&Role>) -> Self {
        Self {
            authenticated: role.is_some(),
            role: role.cloned(),
            home: role.and_then(route_set).map(|set| set.home),
            menu: role.map(menu_for).unwrap_or_default(),
        }
    }
}

pub async fn current_session(State(gate): State<SessionGate>) -> ApiEnvelope<SessionView> {
    let role = gate.role();
    ApiEnvelope::ok(SessionView::for_role(role.as_ref()))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<ApiEnvelope<SessionView>> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("missing_credentials", None));
    }

    let credential = state
        .identity
        .login(&request)
        .await
        .map_err(|err| {
            warn!(error = %err, "login failed at identity service");
            match err {
                IdentityError::Rejected(message) => ApiError::unauthorized("login_failed", message),
                IdentityError::Transport(_) => ApiError::bad_gateway("identity_unreachable", err),
                IdentityError::Decode(_) => ApiError::bad_gateway("identity_response", err),
            }
        })?;

    let role = state
        .gate
        .establish_session(&credential)
        .map_err(|err| match err {
            SessionError::Store(_) => ApiError::unavailable("session_store", err),
            other => ApiError::bad_gateway("invalid_credential", other),
        })?;

    info!(%role, "portal login");
    Ok(ApiEnvelope::ok(SessionView::for_role(Some(&role))).with_message("Login successful"))
}

pub async fn logout(State(gate): State<SessionGate>) -> ApiResult<StatusCode> {
    gate.clear_session()
        .map_err(|err| ApiError::unavailable("session_store", err))?;
    Ok(StatusCode::NO_CONTENT)
}
