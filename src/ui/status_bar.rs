//! Status bar with counters and the latest notice

use eframe::egui;

use crate::core::session::{SessionController, StatusLevel};

/// Status bar
pub struct StatusBar;

impl StatusBar {
    pub fn show(ui: &mut egui::Ui, session: &SessionController) {
        let counts = session.counts();

        ui.horizontal(|ui| {
            ui.label(format!("Words: {}", counts.words));
            ui.separator();
            ui.label(format!("Chars: {}", counts.chars));

            if let Some(status) = session.status() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let color = match status.level {
                        StatusLevel::Info => ui.visuals().text_color(),
                        StatusLevel::Warning => ui.visuals().warn_fg_color,
                    };
                    ui.colored_label(color, &status.text);
                });
            }
        });
    }
}
