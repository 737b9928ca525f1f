use async_trait::async_trait;
use common_http_errors::ApiEnvelope;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity service rejected the login: {0}")]
    Rejected(String),
    #[error("identity service unreachable: {0}")]
    Transport(String),
    #[error("identity service returned an unexpected response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Backend that exchanges user credentials for a session credential.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<String, IdentityError>;
}

#[derive(Clone)]
pub struct HttpIdentityClient {
    client: Client,
    base_url: String,
}

impl HttpIdentityClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn login_url(&self) -> String {
        format!("{}/login", self.base_url)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityClient {
    async fn login(&self, request: &LoginRequest) -> Result<String, IdentityError> {
        let url = self.login_url();
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| IdentityError::Transport(err.to_string()))?;

        let status = response.status();
        let body: Option<Value> = response.json().await.ok();

        let rejected = [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
        ];
        if rejected.contains(&status) {
            let message = body
                .as_ref()
                .and_then(message_of)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(IdentityError::Rejected(message));
        }
        if !status.is_success() {
            return Err(IdentityError::Transport(format!("HTTP {status} from {url}")));
        }

        let body = body.ok_or_else(|| IdentityError::Decode("body is not JSON".into()))?;
        let token = extract_token(body)?;
        debug!(login_url = %url, "identity service issued a credential");
        Ok(token)
    }
}

fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// Accepts `{ "token": .. }` or a success envelope whose data holds it.
fn extract_token(body: Value) -> Result<String, IdentityError> {
    if let Some(token) = body.get("token").and_then(Value::as_str) {
        return Ok(token.to_owned());
    }

    let envelope: ApiEnvelope<Value> = serde_json::from_value(body)
        .map_err(|err| IdentityError::Decode(err.to_string()))?;
    let data = envelope.into_result().map_err(IdentityError::Rejected)?;
    data.get("token")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| IdentityError::Decode("response carries no token".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_at_top_level() {
        let token = extract_token(json!({ "success": true, "token": "a.b.c" })).expect("token");
        assert_eq!(token, "a.b.c");
    }

    #[test]
    fn token_inside_envelope() {
        let token = extract_token(json!({ "success": true, "data": { "token": "x.y.z" } }))
            .expect("token");
        assert_eq!(token, "x.y.z");
    }

    #[test]
    fn failed_envelope_is_a_rejection() {
        let err = extract_token(json!({ "success": false, "message": "Account disabled" }))
            .expect_err("rejected");
        assert!(matches!(err, IdentityError::Rejected(message) if message == "Account disabled"));
    }

    #[test]
    fn missing_token_is_a_decode_error() {
        let err = extract_token(json!({ "success": true, "data": { "user": 1 } })).expect_err("no token");
        assert!(matches!(err, IdentityError::Decode(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = HttpIdentityClient::new("http://auth.local/api/");
        assert_eq!(client.login_url(), "http://auth.local/api/login");
    }
}
