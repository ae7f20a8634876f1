//! File tree panel for document navigation

use eframe::egui;

use crate::core::file_tree::{NodeId, NodeKind, TreeNode};
use crate::core::session::SessionController;

/// File tree panel
pub struct FileTreePanel;

impl FileTreePanel {
    /// Show the file tree panel
    pub fn show(ui: &mut egui::Ui, session: &mut SessionController) {
        let mut clicked = None;

        ui.vertical(|ui| {
            ui.heading("Explorer");
            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("file_tree_scroll")
                .show(ui, |ui| {
                    let roots = session.tree().roots();
                    if roots.is_empty() {
                        ui.label("No documents");
                    }
                    for node in roots {
                        Self::show_node(ui, node, &mut clicked);
                    }
                });
        });

        // Apply after rendering so the tree is not borrowed while it changes
        if let Some(id) = clicked {
            session.click_tree(id);
        }
    }

    /// Recursively show a file tree node
    fn show_node(ui: &mut egui::Ui, node: &TreeNode, clicked: &mut Option<NodeId>) {
        match node.kind {
            NodeKind::Folder {
                expanded,
                ref children,
            } => Self::show_folder(ui, node, expanded, children, clicked),
            NodeKind::File { active } => Self::show_file(ui, node, active, clicked),
        }
    }

    /// Show a folder row and, when expanded, its children
    fn show_folder(
        ui: &mut egui::Ui,
        node: &TreeNode,
        expanded: bool,
        children: &[TreeNode],
        clicked: &mut Option<NodeId>,
    ) {
        let icon = if expanded { "\u{1F4C2}" } else { "\u{1F4C1}" };
        if ui
            .selectable_label(false, format!("{} {}", icon, node.label))
            .clicked()
        {
            *clicked = Some(node.id);
        }

        if expanded {
            ui.indent(node.id, |ui| {
                for child in children {
                    Self::show_node(ui, child, clicked);
                }
            });
        }
    }

    /// Show a file row
    fn show_file(ui: &mut egui::Ui, node: &TreeNode, active: bool, clicked: &mut Option<NodeId>) {
        ui.horizontal(|ui| {
            ui.add_space(16.0); // Indent for files
            if ui
                .selectable_label(active, format!("\u{1F4DD} {}", node.label))
                .clicked()
            {
                *clicked = Some(node.id);
            }
        });
    }
}
