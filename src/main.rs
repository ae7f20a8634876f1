//! Tabfolio - a multi-document writing app
//!
//! A file tree, a tab strip and one editing surface, with every document kept
//! in a local key-value store.

mod app;
mod core;
mod ui;

use app::TabfolioApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> eframe::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting Tabfolio...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([720.0, 480.0])
            .with_title("Tabfolio"),
        ..Default::default()
    };

    eframe::run_native(
        "Tabfolio",
        native_options,
        Box::new(|cc| Ok(Box::new(TabfolioApp::new(cc)))),
    )
}
