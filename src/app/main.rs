//! Skriber desktop client entry point

use eframe::egui;
use tracing_subscriber::EnvFilter;

use skriber::api::storage::StorageArea;
use skriber::app::{views, worker, AppState, Config, UiPrefs};

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skriber=info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(api_url = config.api_url(), "starting skriber");

    let storage = match StorageArea::open_default() {
        Ok(storage) => storage,
        Err(err) => {
            tracing::error!(%err, "failed to open client storage");
            std::process::exit(1);
        }
    };
    let prefs = UiPrefs::new(storage.clone());
    let google_login_url = format!("{}/api/v1/auth/google/login", config.api_url());

    let handle = match worker::spawn(&config, storage) {
        Ok(handle) => handle,
        Err(err) => {
            tracing::error!(%err, "failed to start background worker");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Skriber",
        options,
        Box::new(move |cc| {
            skriber::app::theme::apply_global_theme(&cc.egui_ctx);
            Ok(Box::new(SkriberApp {
                state: AppState::new(handle, prefs, google_login_url),
            }))
        }),
    )
}

struct SkriberApp {
    state: AppState,
}

impl eframe::App for SkriberApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.process_events();

        views::render_top_bar(ctx, &mut self.state);
        views::render_sidebar(ctx, &mut self.state);
        views::render_main_panel(ctx, &mut self.state);

        // Worker events arrive between frames; keep repainting so polling
        // updates surface without user input.
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}
