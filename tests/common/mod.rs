//! Shared test harness
//!
//! A wiremock-backed fake of the Skriber backend plus JSON fixtures for
//! its wire shapes, so suites assemble the client stack against a real
//! HTTP boundary.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use uuid::Uuid;
use wiremock::MockServer;

use skriber::api::storage::StorageArea;
use skriber::api::token::TokenStore;
use skriber::api::Gateway;
use skriber::query::QueryClient;
use skriber::session::SessionContext;

/// Mock backend plus a client stack wired against it. Storage lives in a
/// temp dir that is dropped with the backend.
pub struct TestBackend {
    pub server: MockServer,
    pub gateway: Arc<Gateway>,
    _dir: TempDir,
}

impl TestBackend {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("temp storage dir");
        let area = StorageArea::open(dir.path().to_path_buf()).expect("storage area");
        let gateway =
            Arc::new(Gateway::new(server.uri(), TokenStore::new(area)).expect("gateway"));
        Self {
            server,
            gateway,
            _dir: dir,
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        self.gateway.tokens()
    }

    pub fn query(&self) -> Arc<QueryClient> {
        Arc::new(QueryClient::new(Arc::clone(&self.gateway)))
    }

    pub fn session(&self, query: Arc<QueryClient>) -> SessionContext {
        SessionContext::new(&self.gateway, query)
    }
}

// -- wire fixtures ----------------------------------------------------------

pub fn user_body(username: &str) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "email": format!("{username}@example.com"),
        "username": username,
        "is_active": true,
        "created_at": "2026-01-10T09:00:00Z",
        "updated_at": "2026-01-10T09:00:00Z"
    })
}

pub fn token_body(token: &str) -> Value {
    json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": 3600
    })
}

pub fn recording_body(id: Uuid, url: &str, status: &str) -> Value {
    json!({
        "id": id,
        "meeting_url": url,
        "duration_minutes": 60,
        "status": status,
        "has_transcript": status == "completed",
        "created_at": "2026-02-01T10:00:00Z"
    })
}

pub fn page_body(recordings: Vec<Value>) -> Value {
    json!({
        "total": recordings.len(),
        "limit": 20,
        "offset": 0,
        "recordings": recordings
    })
}

pub fn detail_body(id: Uuid, status: &str) -> Value {
    json!({
        "id": id,
        "meeting_url": "https://meet.example.com/abc-defg",
        "duration_minutes": 60,
        "status": status,
        "created_at": "2026-02-01T10:00:00Z"
    })
}

pub fn usage_body(used: u32, limit: u32) -> Value {
    json!({
        "meetings_used": used,
        "meetings_limit": limit,
        "meetings_remaining": limit.saturating_sub(used),
        "plan_name": "Starter",
        "is_trial": false,
        "can_record": used < limit
    })
}

pub fn subscription_body(cancel_at_period_end: bool) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "user_id": Uuid::new_v4(),
        "plan_id": "starter",
        "plan_name": "Starter",
        "status": "active",
        "meetings_used": 2,
        "meetings_limit": 10,
        "current_period_start": "2026-02-01T00:00:00Z",
        "current_period_end": "2026-03-01T00:00:00Z",
        "cancel_at_period_end": cancel_at_period_end
    })
}

pub fn launch_body(id: Uuid) -> Value {
    json!({
        "created": ["meetbot-job-1"],
        "count": 1,
        "db_status": "ok",
        "recordings": [{
            "job_name": "meetbot-job-1",
            "recording_id": id,
            "gcs_video_uri": format!("gs://skriber-recordings/{id}.mp4")
        }]
    })
}

pub fn delete_body(id: Uuid) -> Value {
    json!({
        "message": "recording deleted",
        "recording_id": id
    })
}
