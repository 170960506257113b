//! Account settings screen

use eframe::egui;

use crate::app::state::AppState;
use crate::app::theme::{colors, styles};
use crate::app::views::field_error_label;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label(
        egui::RichText::new("Settings")
            .size(22.0)
            .strong()
            .color(colors::TEXT_PRIMARY),
    );
    ui.add_space(12.0);

    if let Some(user) = state.user.data.clone() {
        styles::card_frame().show(ui, |ui| {
            ui.label(
                egui::RichText::new("Account")
                    .size(16.0)
                    .strong()
                    .color(colors::TEXT_PRIMARY),
            );
            ui.add_space(6.0);
            ui.colored_label(colors::TEXT_SECONDARY, format!("Username: {}", user.username));
            ui.colored_label(colors::TEXT_SECONDARY, format!("Email: {}", user.email));
            ui.colored_label(
                colors::TEXT_SECONDARY,
                format!("Member since {}", user.created_at.format("%Y-%m-%d")),
            );
            if !user.social_accounts.is_empty() {
                ui.add_space(6.0);
                ui.colored_label(colors::TEXT_SECONDARY, "Linked accounts:");
                for account in &user.social_accounts {
                    ui.colored_label(
                        colors::TEXT_SECONDARY,
                        format!("  {} ({})", account.provider, account.email),
                    );
                }
            }
        });
        ui.add_space(12.0);
    }

    styles::card_frame().show(ui, |ui| {
        ui.label(
            egui::RichText::new("Change password")
                .size(16.0)
                .strong()
                .color(colors::TEXT_PRIMARY),
        );
        ui.add_space(6.0);
        field_error_label(ui, state, "form");

        ui.colored_label(colors::TEXT_SECONDARY, "Current password");
        ui.add_sized(
            [280.0, 26.0],
            egui::TextEdit::singleline(&mut state.current_password_input).password(true),
        );
        field_error_label(ui, state, "current_password");

        ui.colored_label(colors::TEXT_SECONDARY, "New password");
        ui.add_sized(
            [280.0, 26.0],
            egui::TextEdit::singleline(&mut state.new_password_input).password(true),
        );
        field_error_label(ui, state, "new_password");

        ui.colored_label(colors::TEXT_SECONDARY, "Confirm new password");
        ui.add_sized(
            [280.0, 26.0],
            egui::TextEdit::singleline(&mut state.confirm_new_password).password(true),
        );

        ui.add_space(10.0);
        let button = egui::Button::new(
            egui::RichText::new("Update password").color(egui::Color32::WHITE),
        )
        .fill(colors::ACCENT);
        if ui.add_enabled(!state.pending, button).clicked() {
            state.handle_change_password();
        }
    });
}
