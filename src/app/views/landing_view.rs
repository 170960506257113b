//! Marketing landing page

use eframe::egui;

use crate::app::state::AppState;
use crate::app::theme::{colors, styles};
use crate::session::Route;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.vertical_centered(|ui| {
        ui.add_space(60.0);
        ui.label(
            egui::RichText::new("Never take meeting notes again")
                .size(34.0)
                .strong()
                .color(colors::TEXT_PRIMARY),
        );
        ui.add_space(8.0);
        ui.colored_label(
            colors::TEXT_SECONDARY,
            "Skriber joins your meetings, records them, and delivers speaker-attributed transcripts.",
        );
        ui.add_space(24.0);

        ui.horizontal(|ui| {
            ui.add_space(ui.available_width() / 2.0 - 130.0);
            let cta = egui::Button::new(
                egui::RichText::new("Get started").color(egui::Color32::WHITE),
            )
            .fill(colors::ACCENT)
            .min_size(egui::vec2(120.0, 36.0));
            if ui.add(cta).clicked() {
                state.navigate(Route::Register);
            }
            ui.add_space(10.0);
            if ui
                .add(egui::Button::new("Log in").min_size(egui::vec2(120.0, 36.0)))
                .clicked()
            {
                state.navigate(Route::Login);
            }
        });

        ui.add_space(48.0);
        ui.columns(3, |columns| {
            feature_card(
                &mut columns[0],
                "🎥 Automatic recording",
                "A bot joins the call for you and captures video.",
            );
            feature_card(
                &mut columns[1],
                "📝 Transcripts",
                "Speaker-attributed, timestamped transcripts for every meeting.",
            );
            feature_card(
                &mut columns[2],
                "🔎 One dashboard",
                "Launch, track, and review all your meetings in one place.",
            );
        });
    });
}

fn feature_card(ui: &mut egui::Ui, title: &str, body: &str) {
    styles::card_frame().show(ui, |ui| {
        ui.label(
            egui::RichText::new(title)
                .size(16.0)
                .strong()
                .color(colors::TEXT_PRIMARY),
        );
        ui.add_space(6.0);
        ui.colored_label(colors::TEXT_SECONDARY, body);
    });
}
