//! Recordings API client
//!
//! Launching validates its inputs client-side (well-formed meeting URLs,
//! positive duration) before the request goes out; the backend remains
//! authoritative and its own validation errors surface unchanged.

use std::sync::Arc;

use uuid::Uuid;

use crate::api::error::{ApiError, FieldError};
use crate::api::gateway::Gateway;
use crate::api::types::{
    DeleteRecordingResponse, LaunchRequest, LaunchResponse, RecordingDetail, RecordingStats,
    RecordingsPage, RecordingsQuery, Transcript,
};

#[derive(Debug, Clone)]
pub struct RecordingsApi {
    gateway: Arc<Gateway>,
}

impl RecordingsApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Launch recording bots for one or more meetings.
    pub async fn launch(
        &self,
        meeting_urls: &[String],
        duration_min: u32,
    ) -> Result<LaunchResponse, ApiError> {
        let errors = validate_launch(meeting_urls, duration_min);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
        let request = LaunchRequest {
            meetings: meeting_urls.to_vec(),
            duration_min,
            record: true,
        };
        self.gateway.post("/api/v1/meetings/launch", &request).await
    }

    pub async fn list(&self, query: &RecordingsQuery) -> Result<RecordingsPage, ApiError> {
        self.gateway
            .get_with_query("/api/v1/recordings", query)
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<RecordingDetail, ApiError> {
        self.gateway.get(&format!("/api/v1/recordings/{id}")).await
    }

    pub async fn transcript(&self, recording_id: Uuid) -> Result<Transcript, ApiError> {
        self.gateway
            .get(&format!("/api/v1/transcripts/{recording_id}"))
            .await
    }

    pub async fn stats(
        &self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<RecordingStats, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(year) = year {
            query.push(("year", year.to_string()));
        }
        if let Some(month) = month {
            query.push(("month", month.to_string()));
        }
        self.gateway
            .get_with_query("/api/v1/recordings/stats", &query)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<DeleteRecordingResponse, ApiError> {
        self.gateway
            .delete(&format!("/api/v1/recordings/{id}"))
            .await
    }
}

fn validate_launch(meeting_urls: &[String], duration_min: u32) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if meeting_urls.is_empty() {
        errors.push(FieldError::for_field(
            "meetings",
            "at least one meeting URL is required",
            "value_error.missing",
        ));
    }
    for url in meeting_urls {
        match reqwest::Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            _ => errors.push(FieldError::for_field(
                "meetings",
                format!("not a valid meeting URL: {url}"),
                "value_error.url",
            )),
        }
    }
    if duration_min == 0 {
        errors.push(FieldError::for_field(
            "duration_min",
            "duration must be greater than zero",
            "value_error.number.not_gt",
        ));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_launch_accepts_well_formed_input() {
        let urls = vec!["https://meet.example.com/abc-defg".to_string()];
        assert!(validate_launch(&urls, 60).is_empty());
    }

    #[test]
    fn test_validate_launch_rejects_empty_urls() {
        let errors = validate_launch(&[], 30);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), Some("meetings"));
    }

    #[test]
    fn test_validate_launch_rejects_malformed_url() {
        let urls = vec!["not a url".to_string()];
        let errors = validate_launch(&urls, 30);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, "value_error.url");
    }

    #[test]
    fn test_validate_launch_rejects_non_http_scheme() {
        let urls = vec!["ftp://meet.example.com/abc".to_string()];
        let errors = validate_launch(&urls, 30);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_validate_launch_rejects_zero_duration() {
        let urls = vec!["https://meet.example.com/abc".to_string()];
        let errors = validate_launch(&urls, 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), Some("duration_min"));
    }
}
