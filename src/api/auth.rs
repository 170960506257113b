//! Authentication API client
//!
//! Thin typed mapping from auth operations to HTTP calls. The token
//! endpoint speaks form-encoded credentials; everything else is JSON.
//! Errors are never interpreted here.

use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::gateway::Gateway;
use crate::api::types::{
    LoginCredentials, PasswordChange, PasswordReset, PasswordResetConfirm, RegisterRequest, Token,
    UserProfile,
};

#[derive(Debug, Clone)]
pub struct AuthApi {
    gateway: Arc<Gateway>,
}

impl AuthApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, ApiError> {
        self.gateway.post("/api/v1/auth/register", request).await
    }

    /// Exchange credentials for a bearer token. The caller is responsible
    /// for storing it.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Token, ApiError> {
        self.gateway
            .post_form("/api/v1/auth/token", credentials)
            .await
    }

    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.gateway.get("/api/v1/auth/me").await
    }

    pub async fn change_password(&self, request: &PasswordChange) -> Result<(), ApiError> {
        self.gateway
            .post_unit("/api/v1/auth/change-password", request)
            .await
    }

    pub async fn forgot_password(&self, request: &PasswordReset) -> Result<(), ApiError> {
        self.gateway
            .post_unit("/api/v1/auth/forgot-password", request)
            .await
    }

    pub async fn reset_password(&self, request: &PasswordResetConfirm) -> Result<(), ApiError> {
        self.gateway
            .post_unit("/api/v1/auth/reset-password", request)
            .await
    }

    /// Browser redirect target for Google OAuth. The provider eventually
    /// redirects back with a token URL parameter.
    pub fn google_login_url(&self) -> String {
        self.gateway.url("/api/v1/auth/google/login")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::storage::StorageArea;
    use crate::api::token::TokenStore;

    #[test]
    fn test_google_login_url() {
        let dir = tempfile::tempdir().unwrap();
        let area = StorageArea::open(dir.path().to_path_buf()).unwrap();
        let gateway =
            Arc::new(Gateway::new("http://127.0.0.1:8000", TokenStore::new(area)).unwrap());
        let auth = AuthApi::new(gateway);
        assert_eq!(
            auth.google_login_url(),
            "http://127.0.0.1:8000/api/v1/auth/google/login"
        );
    }
}
