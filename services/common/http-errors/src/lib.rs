use axum::{http::{StatusCode, HeaderValue}, response::{IntoResponse, Response}, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `{ success, data, message }` wrapper shared with the portal backends.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")] pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")] pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self { Self { success: true, data: Some(data), message: None } }
    pub fn failure(message: impl Into<String>) -> Self { Self { success: false, data: None, message: Some(message.into()) } }
    pub fn with_message(mut self, message: impl Into<String>) -> Self { self.message = Some(message.into()); self }

    /// Payload of a successful envelope, or its message otherwise.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(self.message.unwrap_or_else(|| "envelope carried no data".into())),
            (false, _) => Err(self.message.unwrap_or_else(|| "request failed".into())),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiEnvelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub success: bool,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")] pub trace_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")] pub message: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized { code: &'static str, trace_id: Option<Uuid>, message: Option<String> },
    BadRequest { code: &'static str, trace_id: Option<Uuid>, message: Option<String> },
    BadGateway { code: &'static str, trace_id: Option<Uuid>, message: Option<String> },
    ServiceUnavailable { code: &'static str, trace_id: Option<Uuid>, message: Option<String> },
    Internal { trace_id: Option<Uuid>, message: Option<String> },
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(e: E, trace_id: Option<Uuid>) -> Self { Self::Internal { trace_id, message: Some(e.to_string()) } }
    pub fn bad_request(code: &'static str, trace_id: Option<Uuid>) -> Self { Self::BadRequest { code, trace_id, message: None } }
    pub fn unauthorized<E: std::fmt::Display>(code: &'static str, e: E) -> Self { Self::Unauthorized { code, trace_id: None, message: Some(e.to_string()) } }
    pub fn bad_gateway<E: std::fmt::Display>(code: &'static str, e: E) -> Self { Self::BadGateway { code, trace_id: None, message: Some(e.to_string()) } }
    pub fn unavailable<E: std::fmt::Display>(code: &'static str, e: E) -> Self { Self::ServiceUnavailable { code, trace_id: None, message: Some(e.to_string()) } }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, trace_id, message) = match self {
            ApiError::Unauthorized { code, trace_id, message }
            | ApiError::BadRequest { code, trace_id, message }
            | ApiError::BadGateway { code, trace_id, message }
            | ApiError::ServiceUnavailable { code, trace_id, message } => (code, trace_id, message),
            ApiError::Internal { trace_id, message } => ("internal_error", trace_id, message),
        };
        let body = ErrorBody { success: false, code: code.into(), trace_id, message };
        let mut resp = (status, Json(body)).into_response();
        if let Ok(val) = HeaderValue::from_str(code) {
            resp.headers_mut().insert("X-Error-Code", val);
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
