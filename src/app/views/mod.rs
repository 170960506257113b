//! egui views
//!
//! One render function per screen, dispatched from the central panel by
//! route. The route guard runs before dispatch: protected screens only
//! ever render in the Authenticated state, and Checking shows the loading
//! indicator.

use eframe::egui;

use crate::app::state::AppState;
use crate::app::theme::{colors, styles};
use crate::app::worker::NoticeLevel;
use crate::session::{GuardDecision, Route};

pub mod auth_view;
pub mod billing_view;
pub mod dashboard_view;
pub mod landing_view;
pub mod meetings_view;
pub mod new_meeting_view;
pub mod settings_view;

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_bar")
        .frame(styles::top_bar_frame())
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if state.route.is_protected() {
                    let icon = if state.sidebar_collapsed { "☰" } else { "✕" };
                    if ui.button(icon).on_hover_text("toggle sidebar").clicked() {
                        state.toggle_sidebar();
                    }
                }
                ui.colored_label(
                    colors::TEXT_LIGHT,
                    egui::RichText::new("⏺ Skriber").size(18.0).strong(),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_space(8.0);
                    if state.has_token {
                        if ui.button("Logout").clicked() {
                            state.handle_logout();
                        }
                        if let Some(user) = &state.user.data {
                            ui.colored_label(colors::TEXT_LIGHT, format!("@{}", user.username));
                        }
                    } else if !state.route.is_auth_screen() {
                        if ui.button("Sign up").clicked() {
                            state.navigate(Route::Register);
                        }
                        if ui.button("Log in").clicked() {
                            state.navigate(Route::Login);
                        }
                    }
                });
            });
        });
}

pub fn render_sidebar(ctx: &egui::Context, state: &mut AppState) {
    if !state.route.is_protected() || state.sidebar_collapsed {
        return;
    }
    egui::SidePanel::left("sidebar")
        .frame(styles::sidebar_frame())
        .resizable(false)
        .exact_width(180.0)
        .show(ctx, |ui| {
            let items = [
                (Route::Dashboard, "📊 Overview"),
                (Route::Meetings, "🎥 Meetings"),
                (Route::NewMeeting, "➕ New meeting"),
                (Route::Billing, "💳 Billing"),
                (Route::Settings, "⚙ Settings"),
            ];
            for (route, label) in items {
                let selected = state.route == route
                    || (route == Route::Meetings
                        && matches!(state.route, Route::MeetingDetail(_)));
                let text = egui::RichText::new(label).color(if selected {
                    colors::TEXT_LIGHT
                } else {
                    colors::TEXT_SECONDARY
                });
                if ui.selectable_label(selected, text).clicked() && state.route != route {
                    state.navigate(route);
                }
                ui.add_space(4.0);
            }
        });
}

pub fn render_main_panel(ctx: &egui::Context, state: &mut AppState) {
    let decision = state.enforce_guard();

    egui::CentralPanel::default()
        .frame(styles::content_frame())
        .show(ctx, |ui| {
            if decision == GuardDecision::Loading {
                render_loading(ui);
                return;
            }
            match state.route.clone() {
                Route::Landing => landing_view::render(ui, state),
                Route::Login => auth_view::render_login(ui, state),
                Route::Register => auth_view::render_register(ui, state),
                Route::ForgotPassword => auth_view::render_forgot_password(ui, state),
                Route::ResetPassword { .. } => auth_view::render_reset_password(ui, state),
                Route::OAuthSuccess { .. } => auth_view::render_oauth_pending(ui),
                Route::Dashboard => dashboard_view::render(ui, state),
                Route::Meetings => meetings_view::render_list(ui, state),
                Route::MeetingDetail(id) => meetings_view::render_detail(ui, state, id),
                Route::NewMeeting => new_meeting_view::render(ui, state),
                Route::Settings => settings_view::render(ui, state),
                Route::Billing => billing_view::render(ui, state),
            }
        });

    render_notices(ctx, state);
}

fn render_loading(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.spinner();
        ui.add_space(8.0);
        ui.colored_label(colors::TEXT_SECONDARY, "Checking session…");
    });
}

/// Non-blocking notification stack in the bottom-right corner.
fn render_notices(ctx: &egui::Context, state: &mut AppState) {
    if state.notices.is_empty() {
        return;
    }
    let mut dismiss = None;
    egui::Area::new(egui::Id::new("notices"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .show(ctx, |ui| {
            for (index, notice) in state.notices.iter().enumerate() {
                let color = match notice.level {
                    NoticeLevel::Success => colors::SUCCESS,
                    NoticeLevel::Error => colors::ERROR,
                    NoticeLevel::Info => colors::INFO,
                };
                styles::card_frame().show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.colored_label(color, &notice.text);
                        if ui.small_button("✕").clicked() {
                            dismiss = Some(index);
                        }
                    });
                });
                ui.add_space(4.0);
            }
        });
    if let Some(index) = dismiss {
        state.dismiss_notice(index);
    }
}

/// Inline form-field error, rendered under the offending input.
pub(crate) fn field_error_label(ui: &mut egui::Ui, state: &AppState, field: &str) {
    if let Some(message) = state.field_error(field) {
        ui.colored_label(colors::ERROR, message);
    }
}
