//! Launch recording screen
//!
//! One or more meeting URLs plus a duration. The usage snapshot gates the
//! launch button; when the quota is exhausted the upgrade modal offers the
//! path to billing instead.

use eframe::egui;

use crate::app::state::AppState;
use crate::app::theme::{colors, styles};
use crate::app::views::field_error_label;
use crate::session::Route;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label(
        egui::RichText::new("New meeting")
            .size(22.0)
            .strong()
            .color(colors::TEXT_PRIMARY),
    );
    ui.add_space(12.0);

    if let Some(usage) = state.usage.clone() {
        styles::card_frame().show(ui, |ui| {
            ui.colored_label(
                colors::TEXT_SECONDARY,
                format!(
                    "{} plan · {} of {} meetings used · {} remaining",
                    usage.plan_name,
                    usage.meetings_used,
                    usage.meetings_limit,
                    usage.meetings_remaining
                ),
            );
        });
        ui.add_space(8.0);
    }

    styles::card_frame().show(ui, |ui| {
        ui.colored_label(colors::TEXT_SECONDARY, "Meeting URLs (one per line)");
        ui.add(
            egui::TextEdit::multiline(&mut state.meeting_urls_input)
                .hint_text("https://meet.google.com/abc-defg-hij")
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        );
        field_error_label(ui, state, "meetings");
        ui.add_space(8.0);

        ui.colored_label(colors::TEXT_SECONDARY, "Duration (minutes)");
        ui.add_sized(
            [120.0, 26.0],
            egui::TextEdit::singleline(&mut state.duration_input),
        );
        field_error_label(ui, state, "duration_min");
        ui.add_space(12.0);

        let can_record = state.can_record();
        let label = if can_record {
            "🎥 Launch recording"
        } else {
            "Meeting limit reached"
        };
        let button = egui::Button::new(egui::RichText::new(label).color(egui::Color32::WHITE))
            .fill(if can_record {
                colors::ACCENT
            } else {
                colors::STATUS_NEUTRAL
            })
            .min_size(egui::vec2(200.0, 34.0));
        if ui.add_enabled(!state.pending, button).clicked() {
            state.handle_launch();
        }
        if state.pending {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.spinner();
                ui.colored_label(colors::TEXT_SECONDARY, "Scheduling bots…");
            });
        }
    });

    render_upgrade_modal(ui, state);
}

fn render_upgrade_modal(ui: &mut egui::Ui, state: &mut AppState) {
    if !state.show_upgrade_modal {
        return;
    }
    egui::Area::new(egui::Id::new("upgrade_modal"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ui.ctx(), |ui| {
            styles::modal_frame().show(ui, |ui| {
                ui.label(
                    egui::RichText::new("You've used all your meetings")
                        .size(18.0)
                        .strong()
                        .color(colors::TEXT_PRIMARY),
                );
                ui.add_space(6.0);
                ui.colored_label(
                    colors::TEXT_SECONDARY,
                    "Upgrade your plan to keep recording this billing period.",
                );
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    let upgrade = egui::Button::new(
                        egui::RichText::new("See plans").color(egui::Color32::WHITE),
                    )
                    .fill(colors::ACCENT);
                    if ui.add(upgrade).clicked() {
                        state.show_upgrade_modal = false;
                        state.navigate(Route::Billing);
                    }
                    if ui.button("Not now").clicked() {
                        state.show_upgrade_modal = false;
                    }
                });
            });
        });
}
