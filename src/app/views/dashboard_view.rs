//! Dashboard overview
//!
//! Stat tiles from the recordings stats endpoint, the usage meter, and the
//! most recent recordings.

use eframe::egui;

use crate::app::state::AppState;
use crate::app::theme::{colors, styles};
use crate::session::Route;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label(
        egui::RichText::new("Overview")
            .size(22.0)
            .strong()
            .color(colors::TEXT_PRIMARY),
    );
    ui.add_space(12.0);

    if let Some(stats) = state.stats.clone() {
        ui.columns(4, |columns| {
            stat_tile(
                &mut columns[0],
                "Total meetings",
                stats.total_recordings.to_string(),
            );
            stat_tile(
                &mut columns[1],
                "Completed",
                stats.completed_recordings.to_string(),
            );
            stat_tile(&mut columns[2], "Failed", stats.failed_recordings.to_string());
            stat_tile(
                &mut columns[3],
                "Minutes recorded",
                format!("{:.0}", stats.total_duration_minutes),
            );
        });
        ui.add_space(12.0);
    }

    if let Some(usage) = state.usage.clone() {
        styles::card_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(
                    colors::TEXT_PRIMARY,
                    egui::RichText::new(format!("{} plan", usage.plan_name)).strong(),
                );
                if usage.is_trial {
                    styles::status_badge(ui, colors::WARNING, "trial");
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.colored_label(
                        colors::TEXT_SECONDARY,
                        format!(
                            "{} of {} meetings used",
                            usage.meetings_used, usage.meetings_limit
                        ),
                    );
                });
            });
            let fraction = if usage.meetings_limit == 0 {
                0.0
            } else {
                usage.meetings_used as f32 / usage.meetings_limit as f32
            };
            ui.add(egui::ProgressBar::new(fraction).desired_height(8.0));
            if !usage.can_record {
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.colored_label(colors::ERROR, "Meeting limit reached.");
                    if ui.link("Upgrade your plan").clicked() {
                        state.navigate(Route::Billing);
                    }
                });
            }
        });
        ui.add_space(12.0);
    }

    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("Recent meetings")
                .size(16.0)
                .strong()
                .color(colors::TEXT_PRIMARY),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.link("View all").clicked() {
                state.navigate(Route::Meetings);
            }
        });
    });
    ui.add_space(6.0);

    let recent: Vec<_> = state.recordings.recordings.iter().take(5).cloned().collect();
    if recent.is_empty() {
        styles::card_frame().show(ui, |ui| {
            ui.colored_label(colors::TEXT_SECONDARY, "No meetings recorded yet.");
            if ui.link("Launch your first recording").clicked() {
                state.navigate(Route::NewMeeting);
            }
        });
        return;
    }
    for recording in recent {
        styles::card_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                styles::status_badge(
                    ui,
                    colors::recording_status_color(recording.status),
                    recording.status.label(),
                );
                ui.colored_label(colors::TEXT_PRIMARY, &recording.meeting_url);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.link("Open").clicked() {
                        state.navigate(Route::MeetingDetail(recording.id));
                    }
                    ui.colored_label(
                        colors::TEXT_SECONDARY,
                        recording.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    );
                });
            });
        });
        ui.add_space(4.0);
    }
}

fn stat_tile(ui: &mut egui::Ui, label: &str, value: String) {
    styles::card_frame().show(ui, |ui| {
        ui.colored_label(colors::TEXT_SECONDARY, label);
        ui.label(
            egui::RichText::new(value)
                .size(26.0)
                .strong()
                .color(colors::TEXT_PRIMARY),
        );
    });
}
