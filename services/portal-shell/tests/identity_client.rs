use httpmock::prelude::*;
use portal_shell::identity::{HttpIdentityClient, IdentityError, IdentityProvider, LoginRequest};
use serde_json::json;

fn request() -> LoginRequest {
    LoginRequest {
        email: "manager@school.test".into(),
        password: "secret".into(),
    }
}

#[tokio::test]
async fn returns_token_from_login_response() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/login")
                .json_body(json!({ "email": "manager@school.test", "password": "secret" }));
            then.status(200).json_body(json!({ "token": "h.p.s", "user": { "id": 7 } }));
        })
        .await;

    let client = HttpIdentityClient::new(server.base_url());
    let token = client.login(&request()).await.expect("token");

    assert_eq!(token, "h.p.s");
    mock.assert_async().await;
}

#[tokio::test]
async fn reads_token_from_success_envelope() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/login");
            then.status(200)
                .json_body(json!({ "success": true, "data": { "token": "e.n.v" } }));
        })
        .await;

    let client = HttpIdentityClient::new(format!("{}/", server.base_url()));
    assert_eq!(client.login(&request()).await.expect("token"), "e.n.v");
}

#[tokio::test]
async fn unauthorized_is_a_rejection_with_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/login");
            then.status(401)
                .json_body(json!({ "success": false, "message": "Invalid credentials" }));
        })
        .await;

    let client = HttpIdentityClient::new(server.base_url());
    let err = client.login(&request()).await.expect_err("rejected");
    assert!(matches!(err, IdentityError::Rejected(message) if message == "Invalid credentials"));
}

#[tokio::test]
async fn server_error_is_a_transport_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/login");
            then.status(500).body("boom");
        })
        .await;

    let client = HttpIdentityClient::new(server.base_url());
    let err = client.login(&request()).await.expect_err("transport");
    assert!(matches!(err, IdentityError::Transport(_)));
}

#[tokio::test]
async fn non_json_success_is_a_decode_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/login");
            then.status(200).body("<html>ok</html>");
        })
        .await;

    let client = HttpIdentityClient::new(server.base_url());
    let err = client.login(&request()).await.expect_err("decode");
    assert!(matches!(err, IdentityError::Decode(_)));
}
