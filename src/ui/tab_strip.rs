//! Tab strip above the editor

use eframe::egui;

use crate::core::session::SessionController;
use crate::core::tabs::TabId;

/// What the user did in the strip this frame
enum TabAction {
    Activate(TabId),
    Close(TabId),
    New,
}

/// Tab strip panel
pub struct TabStripPanel;

impl TabStripPanel {
    /// Show the open tabs followed by the "new tab" control
    pub fn show(ui: &mut egui::Ui, session: &mut SessionController) {
        let mut action = None;

        egui::ScrollArea::horizontal()
            .id_salt("tab_strip_scroll")
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for tab in session.tabs().tabs() {
                        if ui.selectable_label(tab.active, &tab.title).clicked() {
                            action = Some(TabAction::Activate(tab.id));
                        }
                        if ui.small_button("\u{00D7}").on_hover_text("Close").clicked() {
                            action = Some(TabAction::Close(tab.id));
                        }
                        ui.separator();
                    }

                    if ui.button("+").on_hover_text("New tab").clicked() {
                        action = Some(TabAction::New);
                    }
                });
            });

        match action {
            Some(TabAction::Activate(id)) => session.click_tab(id),
            Some(TabAction::Close(id)) => session.close_tab(id),
            Some(TabAction::New) => {
                session.new_untitled();
            }
            None => {}
        }
    }
}
