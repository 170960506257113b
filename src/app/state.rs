//! Central application state shared across egui views
//!
//! Owns the worker handle, the current route, the latest event-driven
//! snapshots, and every form input. Views mutate inputs and call the
//! `handle_*` methods; results come back through `process_events` once per
//! frame.

use std::collections::HashMap;

use uuid::Uuid;

use crate::api::error::FieldError;
use crate::api::types::{
    BillingCycle, CheckoutOrder, Payment, Plan, RecordingDetail, RecordingStats, RecordingStatus,
    RecordingsPage, RecordingsQuery, SortOrder, Subscription, UsageSnapshot, UserProfile,
};
use crate::app::prefs::UiPrefs;
use crate::app::worker::{Command, Event, NoticeLevel, WorkerHandle};
use crate::query::QuerySnapshot;
use crate::session::{decide, GuardDecision, Route};

/// Page size for the meetings list.
pub const LIST_PAGE_SIZE: u32 = 20;

/// How many notices stay visible at once.
const MAX_NOTICES: usize = 4;

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

pub struct AppState {
    worker: WorkerHandle,
    prefs: UiPrefs,
    /// Browser redirect target for "Continue with Google".
    pub google_login_url: String,

    pub route: Route,
    /// Originally requested route, restored after login.
    pub return_to: Option<Route>,

    pub has_token: bool,
    pub user: QuerySnapshot<UserProfile>,

    pub recordings: RecordingsPage,
    pub list_offset: u32,
    pub stats: Option<RecordingStats>,
    pub detail: Option<RecordingDetail>,
    pub detail_missing: Option<Uuid>,
    pub usage: Option<UsageSnapshot>,
    pub subscription: Option<Subscription>,
    pub subscription_missing: bool,
    pub plans: Vec<Plan>,
    pub payments: Vec<Payment>,
    pub checkout: Option<CheckoutOrder>,
    pub portal_url: Option<String>,

    pub login_username: String,
    pub login_password: String,
    pub register_email: String,
    pub register_username: String,
    pub register_password: String,
    pub register_confirm: String,
    pub forgot_email: String,
    pub reset_token: String,
    pub reset_new_password: String,
    pub current_password_input: String,
    pub new_password_input: String,
    pub confirm_new_password: String,
    pub meeting_urls_input: String,
    pub duration_input: String,
    pub search_input: String,
    pub status_filter: Option<RecordingStatus>,
    pub billing_cycle: BillingCycle,

    pub form_errors: HashMap<String, String>,
    pub notices: Vec<Notice>,
    pub pending: bool,
    pub show_upgrade_modal: bool,
    pub sidebar_collapsed: bool,
}

impl AppState {
    pub fn new(worker: WorkerHandle, prefs: UiPrefs, google_login_url: String) -> Self {
        let sidebar_collapsed = prefs.sidebar_collapsed();
        let mut state = Self {
            worker,
            prefs,
            google_login_url,
            route: Route::Landing,
            return_to: None,
            has_token: false,
            user: QuerySnapshot::default(),
            recordings: RecordingsPage::placeholder(),
            list_offset: 0,
            stats: None,
            detail: None,
            detail_missing: None,
            usage: None,
            subscription: None,
            subscription_missing: false,
            plans: Vec::new(),
            payments: Vec::new(),
            checkout: None,
            portal_url: None,
            login_username: String::new(),
            login_password: String::new(),
            register_email: String::new(),
            register_username: String::new(),
            register_password: String::new(),
            register_confirm: String::new(),
            forgot_email: String::new(),
            reset_token: String::new(),
            reset_new_password: String::new(),
            current_password_input: String::new(),
            new_password_input: String::new(),
            confirm_new_password: String::new(),
            meeting_urls_input: String::new(),
            duration_input: "60".to_string(),
            search_input: String::new(),
            status_filter: None,
            billing_cycle: BillingCycle::Monthly,
            form_errors: HashMap::new(),
            notices: Vec::new(),
            pending: false,
            show_upgrade_modal: false,
            sidebar_collapsed,
        };
        state.worker.send(Command::Navigate(Route::Landing));
        state
    }

    // -- navigation ---------------------------------------------------------

    pub fn navigate(&mut self, route: Route) {
        match &route {
            Route::OAuthSuccess { token } => {
                self.worker.send(Command::CompleteOAuth {
                    token: token.clone(),
                });
            }
            Route::ResetPassword { token: Some(token) } => {
                self.reset_token = token.clone();
            }
            _ => {}
        }
        self.form_errors.clear();
        self.detail = None;
        self.detail_missing = None;
        self.route = route.clone();
        self.worker.send(Command::Navigate(route));
    }

    /// Apply the route guard for the current frame. Redirects happen here
    /// so views only ever see Render or Loading.
    pub fn enforce_guard(&mut self) -> GuardDecision {
        let decision = decide(self.has_token, &self.user, &self.route);
        if let GuardDecision::RedirectToLogin { from } = &decision {
            self.return_to = Some(from.clone());
            self.navigate(Route::Login);
            return GuardDecision::Loading;
        }
        decision
    }

    // -- event pump ---------------------------------------------------------

    /// Drain worker events. Called once per frame.
    pub fn process_events(&mut self) {
        while let Some(event) = self.worker.try_recv() {
            self.apply_event(event);
        }
        self.notices
            .truncate(MAX_NOTICES.min(self.notices.len()));
    }

    fn apply_event(&mut self, event: Event) {
        match event {
            Event::Session { has_token, user } => {
                self.has_token = has_token;
                self.user = user;
            }
            Event::LoggedIn => {
                self.pending = false;
                self.login_password.clear();
                self.push_notice(NoticeLevel::Success, "login successful");
                let next = self.return_to.take().unwrap_or(Route::Dashboard);
                self.navigate(next);
            }
            Event::LoggedOut => {
                self.push_notice(NoticeLevel::Success, "logged out");
                self.navigate(Route::Login);
            }
            Event::Unauthorized => {
                if !self.route.is_auth_screen() {
                    self.return_to = Some(self.route.clone());
                    self.push_notice(NoticeLevel::Error, "session expired, please log in again");
                    self.navigate(Route::Login);
                }
            }
            Event::RegistrationComplete => {
                self.pending = false;
                self.register_password.clear();
                self.register_confirm.clear();
                self.push_notice(NoticeLevel::Success, "registration successful, please log in");
                self.navigate(Route::Login);
            }
            Event::PasswordChanged => {
                self.pending = false;
                self.current_password_input.clear();
                self.new_password_input.clear();
                self.confirm_new_password.clear();
                self.push_notice(NoticeLevel::Success, "password changed");
            }
            Event::PasswordResetSent => {
                self.pending = false;
                self.push_notice(NoticeLevel::Success, "password reset email sent");
            }
            Event::PasswordResetComplete => {
                self.pending = false;
                self.push_notice(NoticeLevel::Success, "password reset, please log in");
                self.navigate(Route::Login);
            }
            Event::Recordings(page) => self.recordings = page,
            Event::RecordingDetail(detail) => {
                self.detail_missing = None;
                self.detail = Some(*detail);
            }
            Event::RecordingNotFound(id) => {
                self.detail = None;
                self.detail_missing = Some(id);
            }
            Event::RecordingDeleted(id) => {
                self.push_notice(NoticeLevel::Success, "recording deleted");
                if self.route == Route::MeetingDetail(id) {
                    self.navigate(Route::Meetings);
                }
            }
            Event::Launched(response) => {
                self.pending = false;
                self.meeting_urls_input.clear();
                if response.count > 0 {
                    self.navigate(Route::Meetings);
                }
            }
            Event::Stats(stats) => self.stats = Some(stats),
            Event::Usage(usage) => self.usage = Some(usage),
            Event::SubscriptionLoaded(subscription) => {
                self.subscription_missing = false;
                self.subscription = Some(*subscription);
            }
            Event::SubscriptionMissing => {
                self.subscription = None;
                self.subscription_missing = true;
            }
            Event::Plans(plans) => self.plans = plans,
            Event::Payments(payments) => self.payments = payments,
            Event::CheckoutReady(order) => {
                self.pending = false;
                self.checkout = Some(order);
            }
            Event::PortalReady(url) => {
                self.pending = false;
                self.portal_url = Some(url);
            }
            Event::OAuthComplete(route) => self.navigate(route),
            Event::ValidationFailed { errors, .. } => {
                self.pending = false;
                self.set_field_errors(&errors);
            }
            Event::Notice { level, text } => {
                if level == NoticeLevel::Error {
                    self.pending = false;
                }
                self.push_notice(level, text);
            }
        }
    }

    fn set_field_errors(&mut self, errors: &[FieldError]) {
        self.form_errors.clear();
        for error in errors {
            let field = error.field().unwrap_or("form").to_string();
            self.form_errors.insert(field, error.msg.clone());
        }
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.form_errors.get(field).map(String::as_str)
    }

    fn push_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.insert(
            0,
            Notice {
                level,
                text: text.into(),
            },
        );
    }

    pub fn dismiss_notice(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    // -- form handlers ------------------------------------------------------

    pub fn handle_login(&mut self) {
        self.form_errors.clear();
        if self.login_username.is_empty() || self.login_password.is_empty() {
            self.form_errors.insert(
                "form".to_string(),
                "username and password are required".to_string(),
            );
            return;
        }
        self.pending = true;
        self.worker.send(Command::Login {
            username: self.login_username.clone(),
            password: self.login_password.clone(),
        });
    }

    pub fn handle_register(&mut self) {
        self.form_errors.clear();
        if self.register_username.is_empty() {
            self.form_errors
                .insert("username".to_string(), "username is required".to_string());
            return;
        }
        if self.register_email.is_empty() || self.register_password.is_empty() {
            self.form_errors.insert(
                "form".to_string(),
                "email and password are required".to_string(),
            );
            return;
        }
        if !self.register_email.contains('@') || !self.register_email.contains('.') {
            self.form_errors.insert(
                "email".to_string(),
                "please enter a valid email address".to_string(),
            );
            return;
        }
        if self.register_password != self.register_confirm {
            self.form_errors.insert(
                "password".to_string(),
                "passwords do not match".to_string(),
            );
            return;
        }
        self.pending = true;
        self.worker.send(Command::Register {
            email: self.register_email.clone(),
            username: self.register_username.clone(),
            password: self.register_password.clone(),
        });
    }

    pub fn handle_logout(&mut self) {
        self.worker.send(Command::Logout);
    }

    pub fn handle_forgot_password(&mut self) {
        self.form_errors.clear();
        if self.forgot_email.is_empty() {
            self.form_errors
                .insert("email".to_string(), "email is required".to_string());
            return;
        }
        self.pending = true;
        self.worker.send(Command::ForgotPassword {
            email: self.forgot_email.clone(),
        });
    }

    pub fn handle_reset_password(&mut self) {
        self.form_errors.clear();
        if self.reset_token.is_empty() || self.reset_new_password.is_empty() {
            self.form_errors.insert(
                "form".to_string(),
                "reset token and new password are required".to_string(),
            );
            return;
        }
        self.pending = true;
        self.worker.send(Command::ResetPassword {
            token: self.reset_token.clone(),
            new_password: self.reset_new_password.clone(),
        });
    }

    pub fn handle_change_password(&mut self) {
        self.form_errors.clear();
        if self.current_password_input.is_empty() || self.new_password_input.is_empty() {
            self.form_errors.insert(
                "form".to_string(),
                "current and new passwords are required".to_string(),
            );
            return;
        }
        if self.new_password_input != self.confirm_new_password {
            self.form_errors.insert(
                "new_password".to_string(),
                "passwords do not match".to_string(),
            );
            return;
        }
        self.pending = true;
        self.worker.send(Command::ChangePassword {
            current: self.current_password_input.clone(),
            new: self.new_password_input.clone(),
        });
    }

    /// Launch recordings for every non-empty line of the URL input. The
    /// usage snapshot gates the action client-side; the backend enforces
    /// the quota authoritatively.
    pub fn handle_launch(&mut self) {
        self.form_errors.clear();
        if !self.can_record() {
            self.show_upgrade_modal = true;
            return;
        }
        let urls: Vec<String> = self
            .meeting_urls_input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if urls.is_empty() {
            self.form_errors.insert(
                "meetings".to_string(),
                "enter at least one meeting URL".to_string(),
            );
            return;
        }
        let duration_min = match self.duration_input.trim().parse::<u32>() {
            Ok(minutes) if minutes > 0 => minutes,
            _ => {
                self.form_errors.insert(
                    "duration_min".to_string(),
                    "duration must be a positive number of minutes".to_string(),
                );
                return;
            }
        };
        self.pending = true;
        self.worker.send(Command::Launch { urls, duration_min });
    }

    pub fn handle_delete_recording(&mut self, id: Uuid) {
        self.worker.send(Command::DeleteRecording(id));
    }

    pub fn handle_create_checkout(&mut self, plan_id: String) {
        self.pending = true;
        self.worker.send(Command::CreateCheckout {
            plan_id,
            cycle: self.billing_cycle,
        });
    }

    pub fn handle_checkout_completed(&mut self) {
        self.checkout = None;
        self.worker.send(Command::CheckoutCompleted);
    }

    pub fn handle_cancel_subscription(&mut self) {
        self.worker.send(Command::CancelSubscription);
    }

    pub fn handle_resume_subscription(&mut self) {
        self.worker.send(Command::ResumeSubscription);
    }

    pub fn handle_open_portal(&mut self) {
        self.pending = true;
        self.worker.send(Command::OpenPortal);
    }

    pub fn set_list_page(&mut self, offset: u32) {
        self.list_offset = offset;
        self.worker.send(Command::SetListQuery(self.list_query()));
    }

    pub fn list_query(&self) -> RecordingsQuery {
        RecordingsQuery {
            limit: Some(LIST_PAGE_SIZE),
            offset: Some(self.list_offset),
            sort: Some(SortOrder::Desc),
            ..RecordingsQuery::default()
        }
    }

    // -- derived ------------------------------------------------------------

    /// Advisory launch gate from the usage snapshot. Unknown usage does
    /// not block; the backend has the final say.
    pub fn can_record(&self) -> bool {
        self.usage.as_ref().map_or(true, |usage| usage.can_record)
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        self.prefs.set_sidebar_collapsed(self.sidebar_collapsed);
    }

    /// Rows of the current page matching the local search and status
    /// filters.
    pub fn filtered_recordings(&self) -> Vec<&crate::api::types::Recording> {
        let needle = self.search_input.to_lowercase();
        self.recordings
            .recordings
            .iter()
            .filter(|recording| {
                let matches_search = needle.is_empty()
                    || recording.meeting_url.to_lowercase().contains(&needle)
                    || recording.id.to_string().contains(&needle);
                let matches_status = self
                    .status_filter
                    .map_or(true, |status| recording.status == status);
                matches_search && matches_status
            })
            .collect()
    }
}
