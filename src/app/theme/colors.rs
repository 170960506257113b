//! Color constants for the dashboard theme
//!
//! Dark slate chrome (sidebar, top bar) around a light content area, with
//! an indigo accent and per-status colors for recording badges.

use eframe::egui::Color32;

use crate::api::types::{PaymentStatus, RecordingStatus, TranscriptStatus};

/// Sidebar background - dark slate
pub const SIDEBAR_BG: Color32 = Color32::from_rgb(0x1E, 0x22, 0x2B);

/// Sidebar item hover
pub const SIDEBAR_HOVER: Color32 = Color32::from_rgb(0x2A, 0x2F, 0x3B);

/// Sidebar active item strip
pub const SIDEBAR_ACTIVE: Color32 = Color32::from_rgb(0x39, 0x40, 0x52);

/// Top bar background
pub const TOP_BAR_BG: Color32 = Color32::from_rgb(0x23, 0x28, 0x33);

/// Main content background - near-white
pub const CONTENT_BG: Color32 = Color32::from_rgb(0xF6, 0xF7, 0xF9);

/// Card background
pub const CARD_BG: Color32 = Color32::from_rgb(0xFF, 0xFF, 0xFF);

/// Card border
pub const CARD_BORDER: Color32 = Color32::from_rgb(0xDE, 0xE2, 0xE8);

/// Primary accent - indigo
pub const ACCENT: Color32 = Color32::from_rgb(0x4F, 0x5B, 0xD5);

/// Accent hover
pub const ACCENT_HOVER: Color32 = Color32::from_rgb(0x60, 0x6C, 0xE0);

/// Text on dark backgrounds
pub const TEXT_LIGHT: Color32 = Color32::from_rgb(0xE9, 0xEC, 0xF2);

/// Primary text on light backgrounds
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(0x20, 0x24, 0x2C);

/// Secondary text (muted)
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0x6B, 0x72, 0x80);

/// Success - green
pub const SUCCESS: Color32 = Color32::from_rgb(0x34, 0xA8, 0x53);

/// Error - red
pub const ERROR: Color32 = Color32::from_rgb(0xD9, 0x4A, 0x4A);

/// Warning - amber
pub const WARNING: Color32 = Color32::from_rgb(0xE8, 0xA0, 0x23);

/// Informational - blue
pub const INFO: Color32 = Color32::from_rgb(0x3B, 0x82, 0xC4);

/// In-progress status - blue
pub const STATUS_ACTIVE: Color32 = INFO;

/// Neutral status - gray
pub const STATUS_NEUTRAL: Color32 = Color32::from_rgb(0x9A, 0xA1, 0xAC);

/// Separator/divider on light backgrounds
pub const SEPARATOR: Color32 = Color32::from_rgb(0xE4, 0xE7, 0xEC);

/// Badge color for a recording status.
pub fn recording_status_color(status: RecordingStatus) -> Color32 {
    match status {
        RecordingStatus::Completed => SUCCESS,
        RecordingStatus::Failed => ERROR,
        RecordingStatus::Cancelled => STATUS_NEUTRAL,
        RecordingStatus::Pending | RecordingStatus::Starting => WARNING,
        RecordingStatus::Running
        | RecordingStatus::Recording
        | RecordingStatus::Paused
        | RecordingStatus::Stopping => STATUS_ACTIVE,
    }
}

/// Badge color for a transcript status.
pub fn transcript_status_color(status: TranscriptStatus) -> Color32 {
    match status {
        TranscriptStatus::Completed => SUCCESS,
        TranscriptStatus::Failed => ERROR,
        TranscriptStatus::Pending | TranscriptStatus::Processing => STATUS_ACTIVE,
    }
}

/// Badge color for a payment status.
pub fn payment_status_color(status: PaymentStatus) -> Color32 {
    match status {
        PaymentStatus::Succeeded => SUCCESS,
        PaymentStatus::Failed => ERROR,
        PaymentStatus::Pending => WARNING,
    }
}
