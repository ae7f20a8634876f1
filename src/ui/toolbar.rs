//! Formatting toolbar

use eframe::egui::{self, RichText};

use crate::core::format::FormatCommand;
use crate::core::session::SessionController;

/// Formatting toolbar
pub struct ToolbarPanel;

impl ToolbarPanel {
    /// Show the toolbar; returns true when the user asked for a text export
    pub fn show(ui: &mut egui::Ui, session: &mut SessionController) -> bool {
        let mut command = None;
        let mut export = false;

        ui.horizontal(|ui| {
            for cmd in FormatCommand::ALL {
                if ui
                    .button(Self::label(cmd))
                    .on_hover_text(cmd.name())
                    .clicked()
                {
                    command = Some(cmd.name());
                }
            }

            ui.separator();

            if ui
                .button("\u{2B07} .txt")
                .on_hover_text("Download as plain text")
                .clicked()
            {
                export = true;
            }
        });

        // Buttons dispatch by command name
        if let Some(name) = command {
            if let Err(e) = session.exec_named(name) {
                tracing::warn!("{}", e);
            }
        }

        export
    }

    fn label(cmd: FormatCommand) -> RichText {
        match cmd {
            FormatCommand::Bold => RichText::new("B").strong(),
            FormatCommand::Italic => RichText::new("I").italics(),
            FormatCommand::Underline => RichText::new("U").underline(),
            FormatCommand::Undo => RichText::new("\u{21B6}"),
            FormatCommand::Redo => RichText::new("\u{21B7}"),
        }
    }
}
