//! HTTP gateway
//!
//! The single configured request client everything else goes through. It
//! attaches the bearer token to every outgoing request when one is stored,
//! and globally handles authorization failures: the token is cleared and an
//! auth-failure event is broadcast for the session layer to turn into a
//! login navigation. Every other failure propagates to the caller
//! unchanged.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::error::{self, ApiError};
use crate::api::token::TokenStore;

/// Shared request client with auth injection and global 401 handling.
#[derive(Debug)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
    auth_failures: watch::Sender<u64>,
}

impl Gateway {
    pub fn new(base_url: impl Into<String>, tokens: TokenStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let (auth_failures, _) = watch::channel(0);
        Ok(Self {
            http,
            base_url,
            tokens,
            auth_failures,
        })
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Subscribe to authorization-failure events. The value is a counter
    /// bumped once per failure, so each failure triggers at most one
    /// navigation on the observer side.
    pub fn subscribe_auth_failures(&self) -> watch::Receiver<u64> {
        self.auth_failures.subscribe()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.http.get(self.url(path))).await?;
        Self::decode(response).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.http.get(self.url(path)).query(query);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.url(path)).json(body);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    /// POST with a JSON body, discarding the response body.
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.http.post(self.url(path)).json(body);
        self.execute(request).await?;
        Ok(())
    }

    /// POST with no request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.http.post(self.url(path))).await?;
        Self::decode(response).await
    }

    /// POST with a form-encoded body (the token endpoint's contract).
    pub async fn post_form<F, T>(&self, path: &str, form: &F) -> Result<T, ApiError>
    where
        F: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.url(path)).form(form);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.http.delete(self.url(path))).await?;
        Self::decode(response).await
    }

    /// Attach the bearer token when present, dispatch, and classify the
    /// response status.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let request = match self.tokens.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        self.check(response).await
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            warn!("authorization failure, clearing stored token");
            self.tokens.clear();
            self.auth_failures.send_modify(|n| *n = n.wrapping_add(1));
            return Err(ApiError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "request failed");
        Err(error::classify(status.as_u16(), &body))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::storage::StorageArea;

    fn gateway(base: &str) -> (tempfile::TempDir, Gateway) {
        let dir = tempfile::tempdir().unwrap();
        let area = StorageArea::open(dir.path().to_path_buf()).unwrap();
        let gateway = Gateway::new(base, TokenStore::new(area)).unwrap();
        (dir, gateway)
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let (_dir, gateway) = gateway("http://127.0.0.1:8000");
        assert_eq!(
            gateway.url("/api/v1/auth/me"),
            "http://127.0.0.1:8000/api/v1/auth/me"
        );
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let (_dir, gateway) = gateway("http://127.0.0.1:8000/");
        assert_eq!(
            gateway.url("/api/v1/recordings"),
            "http://127.0.0.1:8000/api/v1/recordings"
        );
    }

    #[test]
    fn test_auth_failure_counter_starts_at_zero() {
        let (_dir, gateway) = gateway("http://127.0.0.1:8000");
        assert_eq!(*gateway.subscribe_auth_failures().borrow(), 0);
    }
}
