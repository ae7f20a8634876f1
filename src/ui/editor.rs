//! Editing surface panel with its path indicator

use eframe::egui;

use crate::core::config::EditorConfig;
use crate::core::session::SessionController;
use crate::core::surface::EditingSurface;

/// Editor panel
pub struct EditorPanel;

impl EditorPanel {
    /// Widget id of the text area
    pub fn text_id() -> egui::Id {
        egui::Id::new("document_editor")
    }

    /// Show the editor panel
    pub fn show(ui: &mut egui::Ui, session: &mut SessionController, config: &EditorConfig) {
        ui.vertical(|ui| {
            Self::show_path(ui, session);
            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("editor_scroll")
                .show(ui, |ui| {
                    let mut buffer = session.surface().content();
                    let output = egui::TextEdit::multiline(&mut buffer)
                        .id(Self::text_id())
                        .font(egui::FontId::proportional(config.font_size))
                        .desired_width(f32::INFINITY)
                        .desired_rows(config.desired_rows)
                        .show(ui);

                    if output.response.changed() {
                        session.input(buffer);
                    }
                    if let Some(range) = output.cursor_range {
                        session.set_selection(range.as_sorted_char_range());
                    }
                });
        });
    }

    /// Path indicator: the current document name, verbatim
    fn show_path(ui: &mut egui::Ui, session: &SessionController) {
        ui.horizontal(|ui| {
            ui.weak("Documents \u{203A}");
            match session.current() {
                Some(_) => {
                    ui.strong(session.path_label());
                }
                None => {
                    ui.weak("no document");
                }
            }
        });
    }
}
