//! Query/cache layer
//!
//! One `QueryClient` owns every cached read the application makes:
//! deduplicated fetching, staleness policy, polling timers, and the
//! invalidation rules mutations apply on success. Screens never talk to
//! the domain API clients directly; they go through here so cached values
//! stay consistent process-wide.
//!
//! Interested parties subscribe to [`QueryEvent`]s to learn when a poller
//! or an invalidation changed something behind their back.

pub mod cache;
pub mod policy;
pub mod poller;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::gateway::Gateway;
use crate::api::token::TokenStore;
use crate::api::types::{
    BillingCycle, CheckoutOrder, DeleteRecordingResponse, LaunchResponse, PasswordChange,
    PasswordReset, PasswordResetConfirm, Payment, Plan, PortalSession, RecordingDetail,
    RecordingStats, RecordingsPage, RecordingsQuery, Subscription, Transcript, UsageSnapshot,
    UserProfile,
};
use crate::api::{AuthApi, RecordingsApi, SubscriptionApi};

pub use cache::{CachedQuery, QueryError, QuerySnapshot};
pub use poller::PollHandle;

/// Logical cache key, used in change events and invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKey {
    CurrentUser,
    Recordings,
    Recording(Uuid),
    Usage,
    Subscription,
    Plans,
    Payments,
    Stats,
}

/// Broadcast whenever cached data changes outside a caller's own await.
#[derive(Debug, Clone)]
pub enum QueryEvent {
    Refreshed(QueryKey),
    RefreshFailed { key: QueryKey, message: String },
    Invalidated(QueryKey),
    CacheCleared,
    /// Final checkout settle pass: everything was invalidated, reload.
    FullReload,
}

/// Process-wide cache over the domain API clients.
#[derive(Debug)]
pub struct QueryClient {
    auth: AuthApi,
    recordings_api: RecordingsApi,
    subscription_api: SubscriptionApi,
    tokens: TokenStore,
    user: CachedQuery<UserProfile>,
    lists: RwLock<HashMap<RecordingsQuery, Arc<CachedQuery<RecordingsPage>>>>,
    details: RwLock<HashMap<Uuid, Arc<CachedQuery<RecordingDetail>>>>,
    usage: CachedQuery<UsageSnapshot>,
    subscription: CachedQuery<Subscription>,
    plans: CachedQuery<Vec<Plan>>,
    payments: CachedQuery<Vec<Payment>>,
    stats: CachedQuery<RecordingStats>,
    events: broadcast::Sender<QueryEvent>,
}

impl QueryClient {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            auth: AuthApi::new(Arc::clone(&gateway)),
            recordings_api: RecordingsApi::new(Arc::clone(&gateway)),
            subscription_api: SubscriptionApi::new(Arc::clone(&gateway)),
            tokens: gateway.tokens().clone(),
            user: CachedQuery::new(policy::CURRENT_USER_STALE),
            lists: RwLock::new(HashMap::new()),
            details: RwLock::new(HashMap::new()),
            usage: CachedQuery::new(policy::USAGE_STALE),
            subscription: CachedQuery::new(policy::SUBSCRIPTION_STALE),
            plans: CachedQuery::new(policy::PLANS_STALE),
            payments: CachedQuery::new(policy::PAYMENTS_STALE),
            stats: CachedQuery::new(policy::STATS_STALE),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueryEvent> {
        self.events.subscribe()
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    fn emit(&self, event: QueryEvent) {
        let _ = self.events.send(event);
    }

    // -- reads --------------------------------------------------------------

    /// The current user, fetched only while a token is present. `None`
    /// means "no token", not "fetch failed".
    pub async fn current_user(&self) -> Result<Option<UserProfile>, QueryError> {
        if !self.tokens.has_token() {
            return Ok(None);
        }
        let api = self.auth.clone();
        let user = self.user.get(move || async move { api.me().await }).await?;
        Ok(Some(user))
    }

    pub async fn user_snapshot(&self) -> QuerySnapshot<UserProfile> {
        self.user.snapshot().await
    }

    pub async fn recordings(&self, query: &RecordingsQuery) -> Result<RecordingsPage, QueryError> {
        let entry = self.list_entry(query).await;
        let api = self.recordings_api.clone();
        let q = query.clone();
        entry.get(move || async move { api.list(&q).await }).await
    }

    /// Whatever the list cache currently holds, or the defined empty page
    /// so screens never need a null check.
    pub async fn recordings_or_placeholder(&self, query: &RecordingsQuery) -> RecordingsPage {
        self.list_entry(query)
            .await
            .peek()
            .await
            .unwrap_or_else(RecordingsPage::placeholder)
    }

    /// Forced list refetch, used by the mounted-list timer.
    pub async fn refetch_recordings(
        &self,
        query: &RecordingsQuery,
    ) -> Result<RecordingsPage, ApiError> {
        let entry = self.list_entry(query).await;
        let api = self.recordings_api.clone();
        let q = query.clone();
        entry
            .refetch(move || async move { api.list(&q).await })
            .await
    }

    pub async fn recording(&self, id: Uuid) -> Result<RecordingDetail, QueryError> {
        let entry = self.detail_entry(id).await;
        let api = self.recordings_api.clone();
        entry.get(move || async move { api.get(id).await }).await
    }

    pub async fn refetch_recording(&self, id: Uuid) -> Result<RecordingDetail, ApiError> {
        let entry = self.detail_entry(id).await;
        let api = self.recordings_api.clone();
        entry.refetch(move || async move { api.get(id).await }).await
    }

    /// Standalone transcript fetch. Uncached: the detail response embeds
    /// transcripts for display; this is for explicit refresh paths.
    pub async fn transcript(&self, recording_id: Uuid) -> Result<Transcript, ApiError> {
        self.recordings_api.transcript(recording_id).await
    }

    pub async fn usage(&self) -> Result<UsageSnapshot, QueryError> {
        let api = self.subscription_api.clone();
        self.usage.get(move || async move { api.usage().await }).await
    }

    pub async fn subscription(&self) -> Result<Subscription, QueryError> {
        let api = self.subscription_api.clone();
        self.subscription
            .get(move || async move { api.current().await })
            .await
    }

    pub async fn plans(&self) -> Result<Vec<Plan>, QueryError> {
        let api = self.subscription_api.clone();
        self.plans.get(move || async move { api.plans().await }).await
    }

    pub async fn payments(&self) -> Result<Vec<Payment>, QueryError> {
        let api = self.subscription_api.clone();
        self.payments
            .get(move || async move { api.payments().await })
            .await
    }

    pub async fn stats(&self) -> Result<RecordingStats, QueryError> {
        let api = self.recordings_api.clone();
        self.stats
            .get(move || async move { api.stats(None, None).await })
            .await
    }

    // -- mutations ----------------------------------------------------------

    /// Launch recording bots. On success the recordings lists, usage, and
    /// stats caches are invalidated so the next read reflects the new
    /// entries; on failure the cache is untouched.
    pub async fn launch_recordings(
        &self,
        meeting_urls: &[String],
        duration_min: u32,
    ) -> Result<LaunchResponse, ApiError> {
        let response = self
            .recordings_api
            .launch(meeting_urls, duration_min)
            .await?;
        info!(count = response.count, "launched recordings");
        self.invalidate_recordings().await;
        self.invalidate_usage().await;
        self.invalidate_stats().await;
        Ok(response)
    }

    pub async fn delete_recording(&self, id: Uuid) -> Result<DeleteRecordingResponse, ApiError> {
        let response = self.recordings_api.delete(id).await?;
        info!(%id, "deleted recording");
        self.details.write().await.remove(&id);
        self.invalidate_recordings().await;
        self.invalidate_stats().await;
        self.emit(QueryEvent::Invalidated(QueryKey::Recording(id)));
        Ok(response)
    }

    pub async fn change_password(&self, request: &PasswordChange) -> Result<(), ApiError> {
        self.auth.change_password(request).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        self.auth
            .forgot_password(&PasswordReset {
                email: email.to_string(),
            })
            .await
    }

    pub async fn reset_password(&self, request: &PasswordResetConfirm) -> Result<(), ApiError> {
        self.auth.reset_password(request).await
    }

    /// Open a pending payment order. Nothing is invalidated here; the
    /// subscription only changes once payment completes.
    pub async fn create_checkout(
        &self,
        plan_id: &str,
        billing_cycle: BillingCycle,
    ) -> Result<CheckoutOrder, ApiError> {
        self.subscription_api
            .create_checkout(plan_id, billing_cycle)
            .await
    }

    pub async fn cancel_subscription(&self) -> Result<String, ApiError> {
        let response = self.subscription_api.cancel().await?;
        self.invalidate_subscription().await;
        self.invalidate_usage().await;
        Ok(response.message)
    }

    pub async fn resume_subscription(&self) -> Result<String, ApiError> {
        let response = self.subscription_api.resume().await?;
        self.invalidate_subscription().await;
        self.invalidate_usage().await;
        Ok(response.message)
    }

    pub async fn portal(&self) -> Result<PortalSession, ApiError> {
        self.subscription_api.portal().await
    }

    /// Payment-widget completion callback. The backend learns about the
    /// payment through an asynchronous webhook, so subscription and usage
    /// are invalidated now and again after fixed delays, with one full
    /// invalidate-and-reload at the end to guarantee consistency.
    pub fn checkout_completed(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            client.settle_subscription().await;
            for pass in 0..policy::CHECKOUT_SETTLE_PASSES {
                tokio::time::sleep(policy::CHECKOUT_SETTLE_STEP).await;
                debug!(pass, "checkout settle pass");
                client.settle_subscription().await;
            }
            let settled = policy::CHECKOUT_SETTLE_STEP * policy::CHECKOUT_SETTLE_PASSES;
            tokio::time::sleep(policy::CHECKOUT_FULL_RELOAD_AFTER - settled).await;
            client.invalidate_all().await;
            client.emit(QueryEvent::FullReload);
        })
    }

    async fn settle_subscription(&self) {
        futures_util::future::join(self.invalidate_subscription(), self.invalidate_usage()).await;
    }

    // -- invalidation -------------------------------------------------------

    pub async fn invalidate_user(&self) {
        self.user.invalidate().await;
        self.emit(QueryEvent::Invalidated(QueryKey::CurrentUser));
    }

    /// Invalidate every cached list page, whatever its filters.
    pub async fn invalidate_recordings(&self) {
        for entry in self.lists.read().await.values() {
            entry.invalidate().await;
        }
        self.emit(QueryEvent::Invalidated(QueryKey::Recordings));
    }

    pub async fn invalidate_recording(&self, id: Uuid) {
        if let Some(entry) = self.details.read().await.get(&id) {
            entry.invalidate().await;
        }
        self.emit(QueryEvent::Invalidated(QueryKey::Recording(id)));
    }

    pub async fn invalidate_usage(&self) {
        self.usage.invalidate().await;
        self.emit(QueryEvent::Invalidated(QueryKey::Usage));
    }

    pub async fn invalidate_subscription(&self) {
        self.subscription.invalidate().await;
        self.emit(QueryEvent::Invalidated(QueryKey::Subscription));
    }

    pub async fn invalidate_stats(&self) {
        self.stats.invalidate().await;
        self.emit(QueryEvent::Invalidated(QueryKey::Stats));
    }

    pub async fn invalidate_all(&self) {
        self.user.invalidate().await;
        self.usage.invalidate().await;
        self.subscription.invalidate().await;
        self.plans.invalidate().await;
        self.payments.invalidate().await;
        self.stats.invalidate().await;
        for entry in self.lists.read().await.values() {
            entry.invalidate().await;
        }
        for entry in self.details.read().await.values() {
            entry.invalidate().await;
        }
    }

    /// Drop all cached data. Used on logout.
    pub async fn clear_all(&self) {
        self.user.clear().await;
        self.usage.clear().await;
        self.subscription.clear().await;
        self.plans.clear().await;
        self.payments.clear().await;
        self.stats.clear().await;
        self.lists.write().await.clear();
        self.details.write().await.clear();
        self.emit(QueryEvent::CacheCleared);
    }

    // -- entries ------------------------------------------------------------

    async fn list_entry(&self, query: &RecordingsQuery) -> Arc<CachedQuery<RecordingsPage>> {
        let mut lists = self.lists.write().await;
        Arc::clone(
            lists
                .entry(query.clone())
                .or_insert_with(|| Arc::new(CachedQuery::new(policy::RECORDINGS_LIST_STALE))),
        )
    }

    async fn detail_entry(&self, id: Uuid) -> Arc<CachedQuery<RecordingDetail>> {
        let mut details = self.details.write().await;
        Arc::clone(
            details
                .entry(id)
                .or_insert_with(|| Arc::new(CachedQuery::new(policy::RECORDING_DETAIL_POLL))),
        )
    }
}
