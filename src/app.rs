//! Main application state and UI coordination

use std::path::PathBuf;

use eframe::egui;

use crate::core::config::AppConfig;
use crate::core::file_tree::FileTree;
use crate::core::session::{SessionController, StatusMessage};
use crate::core::storage::{JsonFileStore, MemoryStore, StorageAdapter};
use crate::core::surface::TextSurface;
use crate::core::tabs::TabStrip;
use crate::ui::{
    editor::EditorPanel, file_tree::FileTreePanel, status_bar::StatusBar,
    tab_strip::TabStripPanel, toolbar::ToolbarPanel,
};

/// Main application state
pub struct TabfolioApp {
    /// The single editing session
    pub session: SessionController,
    /// Application configuration
    pub config: AppConfig,
    /// Whether sidebar is visible
    pub sidebar_visible: bool,
    /// Where the layout is written back; `None` when the file on disk could not be read
    config_path: Option<PathBuf>,
    /// Set once the session has been flushed on close
    flushed: bool,
}

/// Formatting chords, taken before the editor widget sees them
const FORMAT_KEYS: [(egui::Key, char); 3] = [
    (egui::Key::B, 'b'),
    (egui::Key::I, 'i'),
    (egui::Key::U, 'u'),
];

/// Load the configuration, keeping its path only when the file is safe to overwrite
fn open_config(path: Option<PathBuf>) -> (AppConfig, Option<PathBuf>) {
    let Some(path) = path else {
        tracing::warn!("Could not determine config directory, using defaults");
        return (AppConfig::default(), None);
    };
    match AppConfig::load_from(&path) {
        Ok(config) => (config, Some(path)),
        Err(e) => {
            tracing::warn!("Using default config, leaving {} untouched: {:#}", path.display(), e);
            (AppConfig::default(), None)
        }
    }
}

/// Consume formatting and save chords and route them to the session.
///
/// The chords are removed from the input so the focused `TextEdit` never
/// applies its own binding for the same key.
fn route_shortcuts(ctx: &egui::Context, session: &mut SessionController) {
    let (chords, save) = ctx.input_mut(|i| {
        let chords: Vec<char> = FORMAT_KEYS
            .iter()
            .filter(|(key, _)| i.consume_key(egui::Modifiers::COMMAND, *key))
            .map(|(_, c)| *c)
            .collect();
        (chords, i.consume_key(egui::Modifiers::COMMAND, egui::Key::S))
    });

    for key in chords {
        session.shortcut(true, key);
    }
    if save {
        session.save();
    }
}

impl TabfolioApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        // Load config or use defaults
        let (config, config_path) = open_config(AppConfig::config_path());

        let (storage, storage_warning) = Self::open_storage(&config);

        let mut session = SessionController::new(
            FileTree::from_entries(&config.tree),
            TabStrip::from_entries(&config.tabs),
            storage,
            TextSurface::new(),
            config.session.clone(),
        );
        session.startup();
        if let Some(warning) = storage_warning {
            session.set_status(StatusMessage::warning(warning));
        }

        Self {
            session,
            config,
            sidebar_visible: true,
            config_path,
            flushed: false,
        }
    }

    /// Open the on-disk document store, falling back to memory
    fn open_storage(config: &AppConfig) -> (StorageAdapter, Option<String>) {
        let path = config.store_path();
        match JsonFileStore::open(&path, config.storage.quota_bytes) {
            Ok(store) => (StorageAdapter::new(Box::new(store)), None),
            Err(e) => {
                tracing::warn!("Failed to open store {}: {}", path.display(), e);
                let store = match config.storage.quota_bytes {
                    Some(quota) => MemoryStore::with_quota(quota),
                    None => MemoryStore::new(),
                };
                (
                    StorageAdapter::new(Box::new(store)),
                    Some(format!("Documents will not outlive this session: {}", e)),
                )
            }
        }
    }

    /// Write the current document as plain text wherever the user picks
    fn export_document(&mut self) {
        let artifact = self.session.export();
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&artifact.file_name)
            .add_filter("Plain text", &["txt"])
            .save_file()
        else {
            return;
        };

        match std::fs::write(&path, &artifact.text) {
            Ok(()) => {
                tracing::info!("Exported {} to {}", artifact.file_name, path.display());
                self.session
                    .set_status(StatusMessage::info(format!("Exported {}", artifact.file_name)));
            }
            Err(e) => {
                tracing::error!("Failed to export {}: {}", path.display(), e);
                self.session
                    .set_status(StatusMessage::warning(format!("Export failed: {}", e)));
            }
        }
    }

    /// Flush the session and remember the layout; runs once
    fn shutdown(&mut self) {
        if self.flushed {
            return;
        }
        self.flushed = true;

        self.session.teardown();
        self.config.tree = self.session.tree().to_entries();
        self.config.tabs = self.session.tabs().to_entries();
        let Some(ref path) = self.config_path else {
            tracing::info!("Config was not loaded from disk, not saving layout");
            return;
        };
        if let Err(e) = self.config.save_to(path) {
            tracing::error!("Failed to save config: {:#}", e);
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        let mut export = false;

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Tab").clicked() {
                        self.session.new_untitled();
                        ui.close();
                    }
                    if ui.button("Save").clicked() {
                        self.session.save();
                        ui.close();
                    }
                    if ui.button("Export as Text...").clicked() {
                        export = true;
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Toggle Sidebar").clicked() {
                        self.sidebar_visible = !self.sidebar_visible;
                        ui.close();
                    }
                });
            });
        });

        if export {
            self.export_document();
        }
    }
}

impl eframe::App for TabfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        route_shortcuts(ctx, &mut self.session);

        if ctx.input(|i| i.viewport().close_requested()) {
            self.shutdown();
        }

        // Render menu bar
        self.render_menu_bar(ctx);

        let mut export = false;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            export = ToolbarPanel::show(ui, &mut self.session);
        });
        if export {
            self.export_document();
        }

        egui::TopBottomPanel::top("tab_strip").show(ctx, |ui| {
            TabStripPanel::show(ui, &mut self.session);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            StatusBar::show(ui, &self.session);
        });

        // Render sidebar with file tree
        if self.sidebar_visible {
            egui::SidePanel::left("sidebar")
                .resizable(true)
                .default_width(220.0)
                .min_width(150.0)
                .show(ctx, |ui| {
                    FileTreePanel::show(ui, &mut self.session);
                });
        }

        // Render main content area
        egui::CentralPanel::default().show(ctx, |ui| {
            EditorPanel::show(ui, &mut self.session, &self.config.editor);
        });
    }
}
