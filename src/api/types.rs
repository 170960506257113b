//! Wire types for the backend API
//!
//! Request and response shapes for the auth, recordings, and subscription
//! surfaces, plus the status enumerations the client keys behavior on. All
//! entities are owned and mutated server-side; these are the cached,
//! time-bounded copies the client holds.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Bearer token issued on successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: String,
    pub provider_user_id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub social_accounts: Vec<SocialAccount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordReset {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Recordings
// ---------------------------------------------------------------------------

/// Server-side recording lifecycle. Status transitions happen only on the
/// backend; the client re-fetches to observe them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingStatus {
    Pending,
    Starting,
    Running,
    Recording,
    Paused,
    Stopping,
    Completed,
    Failed,
    Cancelled,
}

impl RecordingStatus {
    /// True while the backend may still change this recording's state.
    pub fn is_in_progress(self) -> bool {
        !self.is_terminal()
    }

    /// Completed, failed, or cancelled: no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RecordingStatus::Completed | RecordingStatus::Failed | RecordingStatus::Cancelled
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordingStatus::Pending => "pending",
            RecordingStatus::Starting => "starting",
            RecordingStatus::Running => "running",
            RecordingStatus::Recording => "recording",
            RecordingStatus::Paused => "paused",
            RecordingStatus::Stopping => "stopping",
            RecordingStatus::Completed => "completed",
            RecordingStatus::Failed => "failed",
            RecordingStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LaunchRequest {
    pub meetings: Vec<String>,
    pub duration_min: u32,
    pub record: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchedRecording {
    pub job_name: String,
    pub recording_id: Uuid,
    #[serde(rename = "gcs_video_uri")]
    pub video_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchResponse {
    pub created: Vec<String>,
    pub count: usize,
    pub db_status: String,
    pub recordings: Vec<LaunchedRecording>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub id: Uuid,
    pub meeting_url: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub video_url: Option<String>,
    pub status: RecordingStatus,
    #[serde(default)]
    pub has_transcript: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// One page of the recordings list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingsPage {
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    pub recordings: Vec<Recording>,
}

impl RecordingsPage {
    /// The defined empty page shown while no data has loaded yet, so
    /// screens never need a null check.
    pub fn placeholder() -> Self {
        Self {
            total: 0,
            limit: 0,
            offset: 0,
            recordings: Vec::new(),
        }
    }

    /// Count of recordings the backend is still working on.
    pub fn active_count(&self) -> usize {
        self.recordings
            .iter()
            .filter(|r| r.status.is_in_progress())
            .count()
    }

    pub fn completed_count(&self) -> usize {
        self.recordings
            .iter()
            .filter(|r| r.status == RecordingStatus::Completed)
            .count()
    }
}

/// Transcript lifecycle, independent of the parent recording's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TranscriptStatus {
    pub fn is_in_progress(self) -> bool {
        matches!(self, TranscriptStatus::Pending | TranscriptStatus::Processing)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub speaker: String,
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
}

/// Standalone transcript response from `/transcripts/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub id: Uuid,
    pub status: TranscriptStatus,
    #[serde(default)]
    pub transcript: Vec<TranscriptSegment>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Transcript embedded in a recording detail response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedTranscript {
    pub id: Uuid,
    pub status: TranscriptStatus,
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingDetail {
    pub id: Uuid,
    pub meeting_url: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub video_url: Option<String>,
    pub status: RecordingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub transcript: Option<EmbeddedTranscript>,
}

impl RecordingDetail {
    /// Whether status polling should continue: the recording itself is
    /// still moving, or its transcript is still pending/processing.
    pub fn is_in_progress(&self) -> bool {
        if self.status.is_in_progress() {
            return true;
        }
        self.transcript
            .as_ref()
            .is_some_and(|t| t.status.is_in_progress())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingStats {
    pub total_recordings: u64,
    pub total_duration_minutes: f64,
    pub completed_recordings: u64,
    pub failed_recordings: u64,
    #[serde(default)]
    pub recordings_by_month: Vec<MonthlyStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub month: String,
    pub count: u64,
    pub duration_minutes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRecordingResponse {
    pub message: String,
    pub recording_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Recordings list filter. Doubles as the cache key for list pages, so it
/// must stay hashable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct RecordingsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
}

impl RecordingsQuery {
    pub fn page(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Subscription / billing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Expired,
    Trial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub meetings_limit: u32,
    /// Per-meeting duration cap in minutes; `None` means unlimited.
    #[serde(default)]
    pub duration_limit: Option<u32>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: String,
    pub plan_name: String,
    pub status: SubscriptionStatus,
    pub meetings_used: u32,
    pub meetings_limit: u32,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub cancel_at_period_end: bool,
}

/// Advisory plan-consumption summary used to gate the launch action in the
/// UI. Enforcement is server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub meetings_used: u32,
    pub meetings_limit: u32,
    pub meetings_remaining: u32,
    pub plan_name: String,
    pub is_trial: bool,
    pub can_record: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub plan_id: String,
    pub billing_cycle: BillingCycle,
}

/// Payment-gateway order descriptor returned by checkout creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutOrder {
    pub session_id: String,
    pub checkout_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Succeeded,
    Pending,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub invoice_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalSession {
    pub portal_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
