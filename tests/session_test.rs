//! Session lifecycle against a mock backend
//!
//! Login/logout round trips, the wrong-credentials path, the expired-token
//! path, and the guard decisions that fall out of each.

mod common;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use skriber::api::ApiError;
use skriber::session::{decide, guard_state, GuardDecision, GuardState, Route};

use common::{token_body, user_body, TestBackend};

#[tokio::test]
async fn test_login_then_logout_leaves_store_empty_and_unauthenticated() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-login")))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("alice")))
        .mount(&backend.server)
        .await;

    let query = backend.query();
    let session = backend.session(query.clone());

    session.login("alice", "secret").await.unwrap();
    assert_eq!(backend.tokens().get(), Some("tok-login".to_string()));

    let user = session.current_user().await.unwrap().unwrap();
    assert_eq!(user.username, "alice");
    assert!(session.is_authenticated().await);

    session.logout().await;
    assert!(!backend.tokens().has_token());
    assert!(!session.is_authenticated().await);
    // Cached query data is gone with the session.
    assert!(query.user_snapshot().await.data.is_none());
}

#[tokio::test]
async fn test_wrong_credentials_store_no_token_and_guard_redirects() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "invalid credentials"})),
        )
        .mount(&backend.server)
        .await;

    let query = backend.query();
    let session = backend.session(query.clone());

    let result = session.login("alice", "wrong").await;
    assert_matches!(result, Err(ApiError::Unauthorized));
    assert!(!backend.tokens().has_token());
    assert!(!session.is_authenticated().await);

    // Any protected navigation redirects to login, preserving the target.
    let user = query.user_snapshot().await;
    let decision = decide(session.has_token(), &user, &Route::Meetings);
    assert_eq!(
        decision,
        GuardDecision::RedirectToLogin {
            from: Route::Meetings
        }
    );
}

#[tokio::test]
async fn test_expired_token_clears_and_redirects_preserving_route() {
    let backend = TestBackend::start().await;
    backend.tokens().set("expired-tok");
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&backend.server)
        .await;

    let query = backend.query();
    let session = backend.session(query.clone());
    let mut failures = backend.gateway.subscribe_auth_failures();

    let result = session.current_user().await;
    assert!(result.is_err());

    // The gateway cleared the token and signalled exactly one failure.
    assert!(!backend.tokens().has_token());
    failures.changed().await.unwrap();
    assert_eq!(*failures.borrow_and_update(), 1);

    let user = query.user_snapshot().await;
    assert_eq!(guard_state(session.has_token(), &user), GuardState::Unauthenticated);
    let requested = Route::parse("/dashboard/meetings").unwrap();
    assert_eq!(
        decide(session.has_token(), &user, &requested),
        GuardDecision::RedirectToLogin {
            from: Route::Meetings
        }
    );
}

#[tokio::test]
async fn test_registration_issues_no_token() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(user_body("bob")))
        .mount(&backend.server)
        .await;

    let query = backend.query();
    let session = backend.session(query);

    let profile = session.register("bob@example.com", "bob", "pw12345").await.unwrap();
    assert_eq!(profile.username, "bob");
    // The caller still logs in afterwards.
    assert!(!backend.tokens().has_token());
}

#[tokio::test]
async fn test_oauth_callback_route_persists_token() {
    let backend = TestBackend::start().await;
    let query = backend.query();
    let session = backend.session(query);

    let route = Route::parse("/auth/oauth-success?token=oauth-tok").unwrap();
    let Route::OAuthSuccess { token } = route else {
        panic!("expected oauth route");
    };
    assert_eq!(session.complete_oauth(token.as_deref()), Route::Dashboard);
    assert_eq!(backend.tokens().get(), Some("oauth-tok".to_string()));
}
