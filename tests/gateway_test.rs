//! HTTP gateway behavior against a mock backend
//!
//! Bearer injection, the global 401 contract (token cleared, one
//! navigation signal per failure), and error passthrough for everything
//! else.

mod common;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use skriber::api::types::UserProfile;
use skriber::api::ApiError;

use common::{user_body, TestBackend};

#[tokio::test]
async fn test_authenticated_request_carries_exactly_one_bearer_header() {
    let backend = TestBackend::start().await;
    backend.tokens().set("tok-abc");

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("alice")))
        .expect(1)
        .mount(&backend.server)
        .await;

    let user: UserProfile = backend.gateway.get("/api/v1/auth/me").await.unwrap();
    assert_eq!(user.username, "alice");

    let requests = backend.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let auth_headers = requests[0].headers.get_all("authorization").iter().count();
    assert_eq!(auth_headers, 1);
}

#[tokio::test]
async fn test_request_without_token_is_unauthenticated() {
    let backend = TestBackend::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/subscriptions/plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&backend.server)
        .await;

    let _: Vec<skriber::api::types::Plan> = backend
        .gateway
        .get("/api/v1/subscriptions/plans")
        .await
        .unwrap();

    let requests = backend.server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_unauthorized_clears_token_and_signals_once_per_failure() {
    let backend = TestBackend::start().await;
    backend.tokens().set("expired");
    let mut failures = backend.gateway.subscribe_auth_failures();
    assert_eq!(*failures.borrow(), 0);

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&backend.server)
        .await;

    let result: Result<UserProfile, ApiError> = backend.gateway.get("/api/v1/auth/me").await;
    assert_matches!(result, Err(ApiError::Unauthorized));
    assert!(!backend.tokens().has_token());

    failures.changed().await.unwrap();
    assert_eq!(*failures.borrow_and_update(), 1);

    // A second failure is a new event, observed exactly once more.
    let result: Result<UserProfile, ApiError> = backend.gateway.get("/api/v1/auth/me").await;
    assert_matches!(result, Err(ApiError::Unauthorized));
    failures.changed().await.unwrap();
    assert_eq!(*failures.borrow_and_update(), 2);
}

#[tokio::test]
async fn test_not_found_passes_through() {
    let backend = TestBackend::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/recordings/00000000-0000-0000-0000-000000000000"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "not found"})))
        .mount(&backend.server)
        .await;

    let result: Result<skriber::api::types::RecordingDetail, ApiError> = backend
        .gateway
        .get("/api/v1/recordings/00000000-0000-0000-0000-000000000000")
        .await;
    assert_matches!(result, Err(ApiError::NotFound));
    // Only 401 is handled globally; nothing else touches the token.
    assert_eq!(*backend.gateway.subscribe_auth_failures().borrow(), 0);
}

#[tokio::test]
async fn test_validation_errors_surface_structured() {
    let backend = TestBackend::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [
                {"loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error.email"}
            ]
        })))
        .mount(&backend.server)
        .await;

    let result: Result<UserProfile, ApiError> = backend
        .gateway
        .post(
            "/api/v1/auth/register",
            &json!({"email": "nope", "username": "bob", "password": "pw"}),
        )
        .await;

    let err = result.unwrap_err();
    let fields = err.field_errors().expect("validation errors");
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].field(), Some("email"));
    assert_eq!(fields[0].kind, "value_error.email");
}

#[tokio::test]
async fn test_other_statuses_pass_through_with_detail() {
    let backend = TestBackend::start().await;
    backend.tokens().set("tok");

    Mock::given(method("POST"))
        .and(path("/api/v1/subscriptions/checkout"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"detail": "already subscribed"})),
        )
        .mount(&backend.server)
        .await;

    let result: Result<skriber::api::types::CheckoutOrder, ApiError> = backend
        .gateway
        .post(
            "/api/v1/subscriptions/checkout",
            &json!({"plan_id": "pro", "billing_cycle": "monthly"}),
        )
        .await;

    assert_matches!(
        result,
        Err(ApiError::Api { status: 409, ref detail }) if detail == "already subscribed"
    );
    // Token untouched by non-401 failures.
    assert!(backend.tokens().has_token());
}

#[tokio::test]
async fn test_login_is_form_encoded_and_returns_token() {
    let backend = TestBackend::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::token_body("tok-1")))
        .mount(&backend.server)
        .await;

    let token: skriber::api::types::Token = backend
        .gateway
        .post_form(
            "/api/v1/auth/token",
            &[("username", "alice"), ("password", "secret")],
        )
        .await
        .unwrap();
    assert_eq!(token.access_token, "tok-1");

    let requests = backend.server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(body.contains("username=alice"));
    assert!(body.contains("password=secret"));
}
