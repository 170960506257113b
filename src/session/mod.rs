//! Session context
//!
//! The process-wide view of "who is logged in". Authenticated means a
//! token is present *and* the current-user fetch succeeded; token presence
//! alone is only "possibly authenticated". Constructed once at startup and
//! passed by reference to consumers.

pub mod guard;
pub mod router;

use std::sync::Arc;

use tracing::info;

use crate::api::error::ApiError;
use crate::api::gateway::Gateway;
use crate::api::token::TokenStore;
use crate::api::types::{LoginCredentials, RegisterRequest, Token, UserProfile};
use crate::api::AuthApi;
use crate::query::{QueryClient, QueryError, QuerySnapshot};

pub use guard::{decide, guard_state, GuardDecision, GuardState};
pub use router::Route;

#[derive(Debug)]
pub struct SessionContext {
    auth: AuthApi,
    tokens: TokenStore,
    query: Arc<QueryClient>,
}

impl SessionContext {
    pub fn new(gateway: &Arc<Gateway>, query: Arc<QueryClient>) -> Self {
        Self {
            auth: AuthApi::new(Arc::clone(gateway)),
            tokens: gateway.tokens().clone(),
            query,
        }
    }

    pub fn has_token(&self) -> bool {
        self.tokens.has_token()
    }

    /// Exchange credentials for a token, store it, and mark the cached
    /// user stale so the next read fetches the fresh profile.
    pub async fn login(&self, username: &str, password: &str) -> Result<Token, ApiError> {
        let credentials = LoginCredentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let token = self.auth.login(&credentials).await?;
        self.tokens.set(&token.access_token);
        self.query.invalidate_user().await;
        info!(username, "logged in");
        Ok(token)
    }

    /// Create an account. The caller still logs in afterwards; no token is
    /// issued here.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, ApiError> {
        let request = RegisterRequest {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        };
        self.auth.register(&request).await
    }

    pub async fn current_user(&self) -> Result<Option<UserProfile>, QueryError> {
        self.query.current_user().await
    }

    pub async fn user_snapshot(&self) -> QuerySnapshot<UserProfile> {
        self.query.user_snapshot().await
    }

    /// Token present and the current-user fetch has succeeded.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.has_token() && self.query.user_snapshot().await.data.is_some()
    }

    /// Clear the credential and every cached query. The caller navigates
    /// to the login screen.
    pub async fn logout(&self) {
        info!("logging out");
        self.tokens.clear();
        self.query.clear_all().await;
    }

    /// OAuth callback completion: persist the token from the redirect URL
    /// parameter and head to the dashboard, or back to login if the
    /// provider sent none.
    pub fn complete_oauth(&self, token: Option<&str>) -> Route {
        match token {
            Some(token) if !token.is_empty() => {
                self.tokens.set(token);
                info!("oauth login completed");
                Route::Dashboard
            }
            _ => Route::Login,
        }
    }

    pub fn google_login_url(&self) -> String {
        self.auth.google_login_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::storage::StorageArea;

    fn session() -> (tempfile::TempDir, SessionContext) {
        let dir = tempfile::tempdir().unwrap();
        let area = StorageArea::open(dir.path().to_path_buf()).unwrap();
        let gateway = Arc::new(
            Gateway::new("http://127.0.0.1:8000", TokenStore::new(area)).unwrap(),
        );
        let query = Arc::new(QueryClient::new(Arc::clone(&gateway)));
        let session = SessionContext::new(&gateway, query);
        (dir, session)
    }

    #[tokio::test]
    async fn test_oauth_callback_with_token_persists_and_goes_to_dashboard() {
        let (_dir, session) = session();
        let route = session.complete_oauth(Some("oauth-token-1"));
        assert_eq!(route, Route::Dashboard);
        assert!(session.has_token());
    }

    #[tokio::test]
    async fn test_oauth_callback_without_token_redirects_to_login() {
        let (_dir, session) = session();
        assert_eq!(session.complete_oauth(None), Route::Login);
        assert_eq!(session.complete_oauth(Some("")), Route::Login);
        assert!(!session.has_token());
    }

    #[tokio::test]
    async fn test_logout_clears_token_and_reports_unauthenticated() {
        let (_dir, session) = session();
        session.complete_oauth(Some("tok"));
        assert!(session.has_token());

        session.logout().await;
        assert!(!session.has_token());
        assert!(!session.is_authenticated().await);
    }
}
