//! Meetings list and detail screens
//!
//! The list renders whatever page the cache holds (placeholder before
//! first data) and refreshes on the worker's 15-second timer while
//! mounted. The detail screen shows status, the video link, and the
//! transcript, and keeps polling through the worker while the backend is
//! still working.

use eframe::egui;
use uuid::Uuid;

use crate::api::types::{Recording, RecordingStatus};
use crate::app::state::{AppState, LIST_PAGE_SIZE};
use crate::app::theme::{colors, styles};
use crate::session::Route;

const STATUS_FILTERS: [RecordingStatus; 4] = [
    RecordingStatus::Recording,
    RecordingStatus::Completed,
    RecordingStatus::Failed,
    RecordingStatus::Pending,
];

pub fn render_list(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("Meetings")
                .size(22.0)
                .strong()
                .color(colors::TEXT_PRIMARY),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let launch = egui::Button::new(
                egui::RichText::new("➕ New meeting").color(egui::Color32::WHITE),
            )
            .fill(colors::ACCENT);
            if ui.add(launch).clicked() {
                state.navigate(Route::NewMeeting);
            }
        });
    });
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.add_sized(
            [240.0, 26.0],
            egui::TextEdit::singleline(&mut state.search_input).hint_text("Search by URL or id"),
        );
        ui.add_space(8.0);
        let all = state.status_filter.is_none();
        if ui.selectable_label(all, "all").clicked() {
            state.status_filter = None;
        }
        for status in STATUS_FILTERS {
            let selected = state.status_filter == Some(status);
            if ui.selectable_label(selected, status.label()).clicked() {
                state.status_filter = (!selected).then_some(status);
            }
        }
    });
    ui.add_space(8.0);

    let rows: Vec<Recording> = state.filtered_recordings().into_iter().cloned().collect();
    if rows.is_empty() {
        styles::card_frame().show(ui, |ui| {
            ui.colored_label(colors::TEXT_SECONDARY, "No meetings match.");
        });
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for recording in &rows {
            render_row(ui, state, recording);
            ui.add_space(4.0);
        }
    });

    render_pagination(ui, state);
}

fn render_row(ui: &mut egui::Ui, state: &mut AppState, recording: &Recording) {
    styles::card_frame().show(ui, |ui| {
        ui.horizontal(|ui| {
            styles::status_badge(
                ui,
                colors::recording_status_color(recording.status),
                recording.status.label(),
            );
            ui.vertical(|ui| {
                ui.colored_label(colors::TEXT_PRIMARY, &recording.meeting_url);
                ui.colored_label(
                    colors::TEXT_SECONDARY,
                    format!(
                        "{} · {} min{}",
                        recording.created_at.format("%Y-%m-%d %H:%M"),
                        recording.duration_minutes,
                        if recording.has_transcript {
                            " · transcript"
                        } else {
                            ""
                        }
                    ),
                );
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🗑").on_hover_text("delete").clicked() {
                    state.handle_delete_recording(recording.id);
                }
                if ui.button("Open").clicked() {
                    state.navigate(Route::MeetingDetail(recording.id));
                }
            });
        });
    });
}

fn render_pagination(ui: &mut egui::Ui, state: &mut AppState) {
    let total = state.recordings.total;
    if total <= u64::from(LIST_PAGE_SIZE) {
        return;
    }
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let offset = state.list_offset;
        if ui
            .add_enabled(offset > 0, egui::Button::new("← Previous"))
            .clicked()
        {
            state.set_list_page(offset.saturating_sub(LIST_PAGE_SIZE));
        }
        let page = offset / LIST_PAGE_SIZE + 1;
        let pages = total.div_ceil(u64::from(LIST_PAGE_SIZE));
        ui.colored_label(colors::TEXT_SECONDARY, format!("page {page} of {pages}"));
        let has_next = u64::from(offset + LIST_PAGE_SIZE) < total;
        if ui.add_enabled(has_next, egui::Button::new("Next →")).clicked() {
            state.set_list_page(offset + LIST_PAGE_SIZE);
        }
    });
}

pub fn render_detail(ui: &mut egui::Ui, state: &mut AppState, id: Uuid) {
    if ui.link("← Back to meetings").clicked() {
        state.navigate(Route::Meetings);
        return;
    }
    ui.add_space(8.0);

    // Explicit not-found state with a path back to the list.
    if state.detail_missing == Some(id) {
        styles::card_frame().show(ui, |ui| {
            ui.label(
                egui::RichText::new("Meeting not found")
                    .size(18.0)
                    .strong()
                    .color(colors::TEXT_PRIMARY),
            );
            ui.colored_label(
                colors::TEXT_SECONDARY,
                "This recording does not exist or was deleted.",
            );
        });
        return;
    }

    let Some(detail) = state.detail.clone() else {
        ui.spinner();
        return;
    };

    styles::card_frame().show(ui, |ui| {
        ui.horizontal(|ui| {
            styles::status_badge(
                ui,
                colors::recording_status_color(detail.status),
                detail.status.label(),
            );
            ui.label(
                egui::RichText::new(&detail.meeting_url)
                    .size(16.0)
                    .strong()
                    .color(colors::TEXT_PRIMARY),
            );
        });
        ui.add_space(6.0);
        ui.colored_label(
            colors::TEXT_SECONDARY,
            format!(
                "created {} · {} min",
                detail.created_at.format("%Y-%m-%d %H:%M"),
                detail.duration_minutes
            ),
        );
        if let Some(completed_at) = detail.completed_at {
            ui.colored_label(
                colors::TEXT_SECONDARY,
                format!("completed {}", completed_at.format("%Y-%m-%d %H:%M")),
            );
        }
        if detail.status.is_in_progress() {
            ui.colored_label(colors::STATUS_ACTIVE, "⟳ updating automatically…");
        }
        if let Some(video_url) = &detail.video_url {
            ui.add_space(6.0);
            ui.hyperlink_to("▶ Watch recording", video_url);
        }
        ui.add_space(8.0);
        if ui.button("🗑 Delete recording").clicked() {
            state.handle_delete_recording(id);
        }
    });

    ui.add_space(12.0);
    match &detail.transcript {
        Some(transcript) => {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("Transcript")
                        .size(16.0)
                        .strong()
                        .color(colors::TEXT_PRIMARY),
                );
                styles::status_badge(
                    ui,
                    colors::transcript_status_color(transcript.status),
                    &format!("{:?}", transcript.status).to_lowercase(),
                );
            });
            ui.add_space(6.0);
            if transcript.segments.is_empty() {
                styles::card_frame().show(ui, |ui| {
                    ui.colored_label(colors::TEXT_SECONDARY, "No transcript text yet.");
                });
            } else {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for segment in &transcript.segments {
                        styles::card_frame().show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.colored_label(
                                    colors::ACCENT,
                                    egui::RichText::new(&segment.speaker).strong(),
                                );
                                ui.colored_label(
                                    colors::TEXT_SECONDARY,
                                    format!("{:.0}s – {:.0}s", segment.start_time, segment.end_time),
                                );
                            });
                            ui.colored_label(colors::TEXT_PRIMARY, &segment.text);
                        });
                        ui.add_space(4.0);
                    }
                });
            }
        }
        None => {
            styles::card_frame().show(ui, |ui| {
                ui.colored_label(colors::TEXT_SECONDARY, "No transcript for this recording.");
            });
        }
    }
}
