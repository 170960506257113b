//! Authentication screens
//!
//! Login, registration, and the password flows. Validation errors from the
//! backend land in `state.form_errors` keyed by field and render inline
//! next to the offending input.

use eframe::egui;

use crate::app::state::AppState;
use crate::app::theme::colors;
use crate::app::views::field_error_label;
use crate::session::Route;

const FORM_WIDTH: f32 = 320.0;

fn form_heading(ui: &mut egui::Ui, title: &str) {
    ui.add_space(48.0);
    ui.label(
        egui::RichText::new(title)
            .size(24.0)
            .strong()
            .color(colors::TEXT_PRIMARY),
    );
    ui.add_space(16.0);
}

fn text_input(ui: &mut egui::Ui, label: &str, value: &mut String, password: bool) {
    ui.colored_label(colors::TEXT_SECONDARY, label);
    ui.add_sized(
        [FORM_WIDTH, 28.0],
        egui::TextEdit::singleline(value).password(password),
    );
    ui.add_space(6.0);
}

fn submit_button(ui: &mut egui::Ui, label: &str, pending: bool) -> bool {
    let button = egui::Button::new(
        egui::RichText::new(if pending { "Please wait…" } else { label })
            .color(egui::Color32::WHITE),
    )
    .fill(colors::ACCENT)
    .min_size(egui::vec2(FORM_WIDTH, 34.0));
    ui.add_enabled(!pending, button).clicked()
}

pub fn render_login(ui: &mut egui::Ui, state: &mut AppState) {
    ui.vertical_centered(|ui| {
        form_heading(ui, "Welcome back");
        field_error_label(ui, state, "form");

        text_input(ui, "Username or email", &mut state.login_username, false);
        field_error_label(ui, state, "username");
        text_input(ui, "Password", &mut state.login_password, true);
        field_error_label(ui, state, "password");

        ui.add_space(10.0);
        if submit_button(ui, "Log in", state.pending) {
            state.handle_login();
        }

        ui.add_space(8.0);
        ui.hyperlink_to("Continue with Google", &state.google_login_url);

        ui.add_space(16.0);
        ui.horizontal(|ui| {
            ui.add_space(ui.available_width() / 2.0 - FORM_WIDTH / 2.0);
            if ui.link("Forgot password?").clicked() {
                state.navigate(Route::ForgotPassword);
            }
            ui.add_space(40.0);
            if ui.link("Create an account").clicked() {
                state.navigate(Route::Register);
            }
        });
    });
}

pub fn render_register(ui: &mut egui::Ui, state: &mut AppState) {
    ui.vertical_centered(|ui| {
        form_heading(ui, "Create your account");
        field_error_label(ui, state, "form");

        text_input(ui, "Email", &mut state.register_email, false);
        field_error_label(ui, state, "email");
        text_input(ui, "Username", &mut state.register_username, false);
        field_error_label(ui, state, "username");
        text_input(ui, "Password", &mut state.register_password, true);
        field_error_label(ui, state, "password");
        text_input(ui, "Confirm password", &mut state.register_confirm, true);

        ui.add_space(10.0);
        if submit_button(ui, "Sign up", state.pending) {
            state.handle_register();
        }

        ui.add_space(16.0);
        if ui.link("Already have an account? Log in").clicked() {
            state.navigate(Route::Login);
        }
    });
}

pub fn render_forgot_password(ui: &mut egui::Ui, state: &mut AppState) {
    ui.vertical_centered(|ui| {
        form_heading(ui, "Reset your password");
        ui.colored_label(
            colors::TEXT_SECONDARY,
            "We'll email you a reset token if the address is registered.",
        );
        ui.add_space(10.0);
        field_error_label(ui, state, "form");

        text_input(ui, "Email", &mut state.forgot_email, false);
        field_error_label(ui, state, "email");

        ui.add_space(10.0);
        if submit_button(ui, "Send reset email", state.pending) {
            state.handle_forgot_password();
        }

        ui.add_space(16.0);
        if ui.link("Back to login").clicked() {
            state.navigate(Route::Login);
        }
    });
}

pub fn render_reset_password(ui: &mut egui::Ui, state: &mut AppState) {
    ui.vertical_centered(|ui| {
        form_heading(ui, "Choose a new password");
        field_error_label(ui, state, "form");

        text_input(ui, "Reset token", &mut state.reset_token, false);
        field_error_label(ui, state, "token");
        text_input(ui, "New password", &mut state.reset_new_password, true);
        field_error_label(ui, state, "new_password");

        ui.add_space(10.0);
        if submit_button(ui, "Reset password", state.pending) {
            state.handle_reset_password();
        }

        ui.add_space(16.0);
        if ui.link("Back to login").clicked() {
            state.navigate(Route::Login);
        }
    });
}

/// Shown while the OAuth callback's token is being persisted; the worker
/// answers with the route to land on.
pub fn render_oauth_pending(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.spinner();
        ui.add_space(8.0);
        ui.colored_label(colors::TEXT_SECONDARY, "Completing sign-in…");
    });
}
