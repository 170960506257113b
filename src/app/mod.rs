//! egui desktop application
//!
//! The UI thread is synchronous egui; everything that touches the network
//! lives on the background worker. `AppState` holds the route, the latest
//! event-driven snapshots, and every form input; views render from it and
//! dispatch commands through it.

pub mod config;
pub mod prefs;
pub mod state;
pub mod theme;
pub mod views;
pub mod worker;

pub use config::Config;
pub use prefs::UiPrefs;
pub use state::AppState;
pub use worker::{Command, Event, WorkerHandle};
