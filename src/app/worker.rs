//! Background worker
//!
//! The egui thread stays synchronous; all network and cache work happens
//! on this worker, which owns a tokio runtime on its own thread. The UI
//! sends [`Command`]s and drains [`Event`]s once per frame. The worker
//! also watches the gateway's authorization-failure counter and the query
//! layer's change events, and re-pushes whatever the current screen needs.

use std::sync::mpsc as std_mpsc;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, FieldError};
use crate::api::gateway::Gateway;
use crate::api::storage::StorageArea;
use crate::api::token::TokenStore;
use crate::api::types::{
    BillingCycle, CheckoutOrder, LaunchResponse, PasswordChange, PasswordResetConfirm, Payment,
    Plan, RecordingDetail, RecordingStats, RecordingsPage, RecordingsQuery, Subscription,
    UsageSnapshot, UserProfile,
};
use crate::app::config::Config;
use crate::payment::{HostedCheckout, PaymentGateway};
use crate::query::{PollHandle, QueryClient, QueryError, QueryEvent, QueryKey, QuerySnapshot};
use crate::session::{Route, SessionContext};

/// Requests from the UI thread.
#[derive(Debug)]
pub enum Command {
    Navigate(Route),
    SetListQuery(RecordingsQuery),
    RefreshRecordings,
    Login { username: String, password: String },
    Register { email: String, username: String, password: String },
    /// OAuth redirect landed; persist the token parameter if present.
    CompleteOAuth { token: Option<String> },
    Logout,
    ChangePassword { current: String, new: String },
    ForgotPassword { email: String },
    ResetPassword { token: String, new_password: String },
    Launch { urls: Vec<String>, duration_min: u32 },
    DeleteRecording(Uuid),
    CreateCheckout { plan_id: String, cycle: BillingCycle },
    CheckoutCompleted,
    CancelSubscription,
    ResumeSubscription,
    OpenPortal,
}

/// Which form a batch of validation errors belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Login,
    Register,
    Launch,
    ChangePassword,
    ForgotPassword,
    ResetPassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Updates for the UI thread.
#[derive(Debug)]
pub enum Event {
    Session {
        has_token: bool,
        user: QuerySnapshot<UserProfile>,
    },
    LoggedIn,
    LoggedOut,
    /// Authorization failure observed by the gateway; the token is
    /// already cleared.
    Unauthorized,
    RegistrationComplete,
    PasswordChanged,
    PasswordResetSent,
    PasswordResetComplete,
    Recordings(RecordingsPage),
    RecordingDetail(Box<RecordingDetail>),
    RecordingNotFound(Uuid),
    RecordingDeleted(Uuid),
    Launched(LaunchResponse),
    Stats(RecordingStats),
    Usage(UsageSnapshot),
    SubscriptionLoaded(Box<Subscription>),
    /// The user has no subscription record (e.g. never upgraded).
    SubscriptionMissing,
    Plans(Vec<Plan>),
    Payments(Vec<Payment>),
    CheckoutReady(CheckoutOrder),
    PortalReady(String),
    /// Where the OAuth callback resolved to: dashboard with a stored
    /// token, or back to login without one.
    OAuthComplete(Route),
    ValidationFailed {
        form: FormTarget,
        errors: Vec<FieldError>,
    },
    Notice {
        level: NoticeLevel,
        text: String,
    },
}

/// UI-side handle: send commands, drain events.
pub struct WorkerHandle {
    commands: UnboundedSender<Command>,
    events: std_mpsc::Receiver<Event>,
}

impl WorkerHandle {
    pub fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("worker is gone; command dropped");
        }
    }

    pub fn try_recv(&self) -> Option<Event> {
        self.events.try_recv().ok()
    }
}

/// Errors that prevent the client from starting at all.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to open client storage: {0}")]
    Storage(#[from] std::io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Build the client stack and start the worker thread.
pub fn spawn(config: &Config, storage: StorageArea) -> Result<WorkerHandle, StartupError> {
    let tokens = TokenStore::new(storage);
    let gateway = Arc::new(Gateway::new(config.api_url(), tokens)?);
    let auth_failures = gateway.subscribe_auth_failures();
    let query = Arc::new(QueryClient::new(Arc::clone(&gateway)));
    let session = SessionContext::new(&gateway, Arc::clone(&query));
    let payment: Arc<dyn PaymentGateway> = Arc::new(HostedCheckout::new());

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = std_mpsc::channel();

    std::thread::Builder::new()
        .name("skriber-worker".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!(%err, "failed to build worker runtime");
                    return;
                }
            };
            let worker = Worker {
                session,
                query,
                payment,
                events: event_tx,
                route: Route::Landing,
                list_query: RecordingsQuery::default(),
                list_poller: None,
                detail_poller: None,
            };
            runtime.block_on(worker.run(command_rx, auth_failures));
            info!("worker stopped");
        })
        .map_err(StartupError::Storage)?;

    Ok(WorkerHandle {
        commands: command_tx,
        events: event_rx,
    })
}

struct Worker {
    session: SessionContext,
    query: Arc<QueryClient>,
    payment: Arc<dyn PaymentGateway>,
    events: std_mpsc::Sender<Event>,
    route: Route,
    list_query: RecordingsQuery,
    list_poller: Option<PollHandle>,
    detail_poller: Option<(Uuid, PollHandle)>,
}

impl Worker {
    async fn run(
        mut self,
        mut commands: UnboundedReceiver<Command>,
        mut auth_failures: watch::Receiver<u64>,
    ) {
        let mut query_events = self.query.subscribe();
        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    self.handle_command(command).await;
                }
                changed = auth_failures.changed() => {
                    if changed.is_err() {
                        continue;
                    }
                    // Token already cleared by the gateway. One navigation
                    // per failure event, and none while on an auth screen.
                    if !self.route.is_auth_screen() {
                        self.send(Event::Unauthorized);
                    }
                    self.push_session().await;
                }
                event = query_events.recv() => {
                    if let Ok(event) = event {
                        self.handle_query_event(event).await;
                    }
                }
            }
        }
    }

    fn send(&self, event: Event) {
        if self.events.send(event).is_err() {
            warn!("ui is gone; event dropped");
        }
    }

    fn notice(&self, level: NoticeLevel, text: impl Into<String>) {
        self.send(Event::Notice {
            level,
            text: text.into(),
        });
    }

    /// Report a mutation failure: validation errors go to the form, the
    /// rest becomes a notice. The cache was left untouched by the caller.
    fn report_failure(&self, form: FormTarget, err: ApiError) {
        match err {
            ApiError::Validation(errors) => self.send(Event::ValidationFailed { form, errors }),
            ApiError::Unauthorized => {} // gateway event handles navigation
            other => self.notice(NoticeLevel::Error, other.display_message()),
        }
    }

    fn report_read_failure(&self, err: &QueryError) {
        if !err.is_unauthorized() {
            self.notice(NoticeLevel::Error, err.display_message());
        }
    }

    /// Mutation failure outside any form: a notice is all there is to
    /// show. Nothing is rolled back because nothing was applied
    /// optimistically.
    fn report_mutation_failure(&self, err: ApiError) {
        if !err.is_unauthorized() {
            self.notice(NoticeLevel::Error, err.display_message());
        }
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Navigate(route) => {
                self.route = route;
                self.sync_pollers();
                self.push_session().await;
                self.push_route_data().await;
            }
            Command::SetListQuery(query) => {
                self.list_query = query;
                // Restart the list timer against the new filters.
                self.list_poller = None;
                self.sync_pollers();
                self.push_recordings().await;
            }
            Command::RefreshRecordings => match self.query.refetch_recordings(&self.list_query).await {
                Ok(page) => self.send(Event::Recordings(page)),
                Err(err) => self.report_mutation_failure(err),
            },
            Command::Login { username, password } => {
                match self.session.login(&username, &password).await {
                    Ok(_) => {
                        self.push_session().await;
                        self.send(Event::LoggedIn);
                    }
                    Err(ApiError::Unauthorized) => {
                        // Wrong credentials: no token was stored; surface
                        // it on the form rather than navigating.
                        self.send(Event::ValidationFailed {
                            form: FormTarget::Login,
                            errors: vec![FieldError::for_field(
                                "password",
                                "invalid username or password",
                                "value_error.credentials",
                            )],
                        });
                    }
                    Err(err) => self.report_failure(FormTarget::Login, err),
                }
            }
            Command::Register {
                email,
                username,
                password,
            } => match self.session.register(&email, &username, &password).await {
                Ok(_) => self.send(Event::RegistrationComplete),
                Err(err) => self.report_failure(FormTarget::Register, err),
            },
            Command::CompleteOAuth { token } => {
                let route = self.session.complete_oauth(token.as_deref());
                self.push_session().await;
                self.send(Event::OAuthComplete(route));
            }
            Command::Logout => {
                self.session.logout().await;
                self.list_poller = None;
                self.detail_poller = None;
                self.push_session().await;
                self.send(Event::LoggedOut);
            }
            Command::ChangePassword { current, new } => {
                let request = PasswordChange {
                    current_password: current,
                    new_password: new,
                };
                match self.query.change_password(&request).await {
                    Ok(()) => self.send(Event::PasswordChanged),
                    Err(err) => self.report_failure(FormTarget::ChangePassword, err),
                }
            }
            Command::ForgotPassword { email } => {
                match self.query.forgot_password(&email).await {
                    Ok(()) => self.send(Event::PasswordResetSent),
                    Err(err) => self.report_failure(FormTarget::ForgotPassword, err),
                }
            }
            Command::ResetPassword {
                token,
                new_password,
            } => {
                let request = PasswordResetConfirm {
                    token,
                    new_password,
                };
                match self.query.reset_password(&request).await {
                    Ok(()) => self.send(Event::PasswordResetComplete),
                    Err(err) => self.report_failure(FormTarget::ResetPassword, err),
                }
            }
            Command::Launch { urls, duration_min } => {
                match self.query.launch_recordings(&urls, duration_min).await {
                    Ok(response) => {
                        self.notice(
                            NoticeLevel::Success,
                            format!("launched {} recording(s)", response.count),
                        );
                        self.send(Event::Launched(response));
                    }
                    Err(err) => self.report_failure(FormTarget::Launch, err),
                }
            }
            Command::DeleteRecording(id) => match self.query.delete_recording(id).await {
                Ok(_) => {
                    self.send(Event::RecordingDeleted(id));
                    self.push_recordings().await;
                }
                Err(err) => self.report_mutation_failure(err),
            },
            Command::CreateCheckout { plan_id, cycle } => {
                match self.query.create_checkout(&plan_id, cycle).await {
                    Ok(order) => {
                        if let Err(err) = self.payment.open_checkout(&order) {
                            self.notice(NoticeLevel::Error, err.to_string());
                        } else {
                            self.send(Event::CheckoutReady(order));
                        }
                    }
                    Err(err) => self.report_mutation_failure(err),
                }
            }
            Command::CheckoutCompleted => {
                match self.payment.finish() {
                    Ok(order) => info!(session_id = %order.session_id, "checkout completed"),
                    Err(err) => warn!(%err, "checkout completion without active order"),
                }
                // Settle schedule: invalidations arrive as query events
                // and re-push billing data as the webhook lands.
                let _task = self.query.checkout_completed();
                self.notice(NoticeLevel::Info, "payment received, updating subscription");
            }
            Command::CancelSubscription => match self.query.cancel_subscription().await {
                Ok(message) => {
                    self.notice(NoticeLevel::Success, message);
                    self.push_billing().await;
                }
                Err(err) => self.report_mutation_failure(err),
            },
            Command::ResumeSubscription => match self.query.resume_subscription().await {
                Ok(message) => {
                    self.notice(NoticeLevel::Success, message);
                    self.push_billing().await;
                }
                Err(err) => self.report_mutation_failure(err),
            },
            Command::OpenPortal => match self.query.portal().await {
                Ok(portal) => self.send(Event::PortalReady(portal.portal_url)),
                Err(err) => self.report_mutation_failure(err),
            },
        }
    }

    async fn handle_query_event(&mut self, event: QueryEvent) {
        match event {
            QueryEvent::Refreshed(QueryKey::Recordings)
            | QueryEvent::Invalidated(QueryKey::Recordings) => {
                if self.wants_recordings() {
                    self.push_recordings().await;
                }
            }
            QueryEvent::Refreshed(QueryKey::Recording(id))
            | QueryEvent::Invalidated(QueryKey::Recording(id)) => {
                if self.route == Route::MeetingDetail(id) {
                    self.push_detail(id).await;
                }
            }
            QueryEvent::Invalidated(QueryKey::Usage) | QueryEvent::Refreshed(QueryKey::Usage) => {
                if matches!(self.route, Route::NewMeeting | Route::Billing | Route::Dashboard) {
                    self.push_usage().await;
                }
            }
            QueryEvent::Invalidated(QueryKey::Subscription)
            | QueryEvent::Refreshed(QueryKey::Subscription) => {
                if self.route == Route::Billing {
                    self.push_subscription().await;
                }
            }
            QueryEvent::Invalidated(QueryKey::Stats) | QueryEvent::Refreshed(QueryKey::Stats) => {
                if self.route == Route::Dashboard {
                    self.push_stats().await;
                }
            }
            QueryEvent::RefreshFailed { message, .. } => {
                // Background refresh failed: non-blocking notice, stale
                // data stays on screen.
                self.notice(NoticeLevel::Error, message);
            }
            QueryEvent::FullReload => {
                self.push_session().await;
                self.push_route_data().await;
            }
            _ => {}
        }
    }

    fn wants_recordings(&self) -> bool {
        matches!(self.route, Route::Dashboard | Route::Meetings)
    }

    /// Start/stop polling to match the mounted screen. Dropping a handle
    /// aborts its task.
    fn sync_pollers(&mut self) {
        if self.wants_recordings() {
            if self.list_poller.is_none() {
                self.list_poller = Some(self.query.spawn_list_poller(self.list_query.clone()));
            }
        } else {
            self.list_poller = None;
        }

        match self.route {
            Route::MeetingDetail(id) => {
                let stale = self
                    .detail_poller
                    .as_ref()
                    .is_none_or(|(current, _)| *current != id);
                if stale {
                    self.detail_poller = Some((id, self.query.spawn_detail_poller(id)));
                }
            }
            _ => self.detail_poller = None,
        }
    }

    async fn push_session(&self) {
        if self.session.has_token() {
            // Populate (or revalidate) the cached profile; failures land
            // in the snapshot below.
            let _ = self.query.current_user().await;
        }
        self.send(Event::Session {
            has_token: self.session.has_token(),
            user: self.query.user_snapshot().await,
        });
    }

    async fn push_route_data(&mut self) {
        match self.route.clone() {
            Route::Dashboard => {
                self.push_recordings().await;
                self.push_stats().await;
                self.push_usage().await;
            }
            Route::Meetings => self.push_recordings().await,
            Route::MeetingDetail(id) => self.push_detail(id).await,
            Route::NewMeeting => self.push_usage().await,
            Route::Billing => self.push_billing().await,
            _ => {}
        }
    }

    async fn push_recordings(&self) {
        match self.query.recordings(&self.list_query).await {
            Ok(page) => self.send(Event::Recordings(page)),
            Err(err) => {
                self.report_read_failure(&err);
                // Placeholder (or stale data) keeps the screen defined.
                self.send(Event::Recordings(
                    self.query.recordings_or_placeholder(&self.list_query).await,
                ));
            }
        }
    }

    async fn push_detail(&self, id: Uuid) {
        match self.query.recording(id).await {
            Ok(detail) => self.send(Event::RecordingDetail(Box::new(detail))),
            Err(err) if err.is_not_found() => self.send(Event::RecordingNotFound(id)),
            Err(err) => self.report_read_failure(&err),
        }
    }

    async fn push_stats(&self) {
        match self.query.stats().await {
            Ok(stats) => self.send(Event::Stats(stats)),
            Err(err) => self.report_read_failure(&err),
        }
    }

    async fn push_usage(&self) {
        match self.query.usage().await {
            Ok(usage) => self.send(Event::Usage(usage)),
            Err(err) => self.report_read_failure(&err),
        }
    }

    async fn push_subscription(&self) {
        match self.query.subscription().await {
            Ok(subscription) => self.send(Event::SubscriptionLoaded(Box::new(subscription))),
            Err(err) if err.is_not_found() => self.send(Event::SubscriptionMissing),
            Err(err) => self.report_read_failure(&err),
        }
    }

    async fn push_billing(&self) {
        match self.query.plans().await {
            Ok(plans) => self.send(Event::Plans(plans)),
            Err(err) => self.report_read_failure(&err),
        }
        self.push_subscription().await;
        self.push_usage().await;
        match self.query.payments().await {
            Ok(payments) => self.send(Event::Payments(payments)),
            Err(err) => self.report_read_failure(&err),
        }
    }
}
