//! Session controller: keeps the tree, tabs, editing surface and storage in step
//!
//! Every change of "what is being edited" goes through [`SessionController::open`]
//! or one of the flows built on it. The rendering layer only reads state and
//! reports clicks, edits and commands back here.

use std::ops::Range;

use super::config::SessionConfig;
use super::document::Document;
use super::file_tree::{label_starts_with, FileTree, NodeId, TreeClick};
use super::format::{
    plain_text, resolve_shortcut, ExportArtifact, FormatCommand, TextCounts, UnknownCommand,
};
use super::storage::StorageAdapter;
use super::surface::{EditingSurface, TextSurface};
use super::tabs::{TabId, TabStrip};

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
}

/// Latest user-visible notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Warning,
            text: text.into(),
        }
    }
}

/// Owner of the current document pointer
pub struct SessionController<S: EditingSurface = TextSurface> {
    /// Document being edited; `None` only after the last tab closed without recovery
    current: Option<String>,
    /// Text of the path indicator
    path_label: String,
    tabs: TabStrip,
    tree: FileTree,
    storage: StorageAdapter,
    surface: S,
    counts: TextCounts,
    settings: SessionConfig,
    status: Option<StatusMessage>,
}

impl<S: EditingSurface> SessionController<S> {
    /// Create a session; call [`Self::startup`] before use
    pub fn new(
        tree: FileTree,
        tabs: TabStrip,
        storage: StorageAdapter,
        surface: S,
        settings: SessionConfig,
    ) -> Self {
        Self {
            current: None,
            path_label: String::new(),
            tabs,
            tree,
            storage,
            surface,
            counts: TextCounts::default(),
            settings,
            status: None,
        }
    }

    /// Open the tree's active file, else the strip's active tab, else the fallback title
    pub fn startup(&mut self) {
        let name = self
            .tree
            .active_file()
            .map(str::to_string)
            .or_else(|| self.tabs.active().map(|t| t.title.clone()))
            .unwrap_or_else(|| self.settings.fallback_title.clone());
        tracing::info!("Starting session with {}", name);
        self.open(&name);
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn path_label(&self) -> &str {
        &self.path_label
    }

    pub fn tabs(&self) -> &TabStrip {
        &self.tabs
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn counts(&self) -> TextCounts {
        self.counts
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }

    /// Switch to `name`, reusing its tab or creating one
    pub fn open(&mut self, name: &str) {
        let tab = match self.tabs.find_by_title(name) {
            Some(tab) => tab,
            None => self.tabs.create(name),
        };
        self.activate_tab(tab);
        self.load_document(name);
    }

    /// A click in the file tree: folders toggle, files open
    pub fn click_tree(&mut self, id: NodeId) {
        match self.tree.click(id) {
            Some(TreeClick::Open(name)) => self.open(&name),
            Some(TreeClick::Toggled(expanded)) => {
                tracing::debug!("Folder {:?} expanded: {}", id, expanded);
            }
            None => tracing::warn!("Click on unknown tree node {:?}", id),
        }
    }

    /// A click on a tab body
    pub fn click_tab(&mut self, id: TabId) {
        let Some(title) = self.tabs.get(id).map(|t| t.title.clone()) else {
            tracing::warn!("Click on unknown tab {:?}", id);
            return;
        };
        self.activate_tab(id);
        self.load_document(&title);
    }

    /// Close a tab; nothing is saved or deleted by closing
    pub fn close_tab(&mut self, id: TabId) {
        let Some(closed) = self.tabs.close(id) else {
            return;
        };
        tracing::info!("Closed tab {}", closed.title);

        if let Some(neighbor) = closed.activated {
            self.click_tab(neighbor);
        } else if self.tabs.is_empty() {
            if self.settings.keep_one_tab_open {
                self.new_untitled();
            } else {
                self.current = None;
                self.path_label.clear();
                self.tree.clear_active();
            }
        }
    }

    /// Create, open and file the lowest-numbered free untitled document
    pub fn new_untitled(&mut self) -> String {
        let title = self.tabs.next_untitled_title(&self.settings.untitled_prefix);
        let tab = self.tabs.create(&title);
        self.activate_tab(tab);
        self.load_document(&title);

        if !self.tree.contains_file(&title) {
            let folder = self.settings.untitled_folder.clone();
            self.tree.insert_file(&title, label_starts_with(&folder));
        }
        self.tree.mark_active(&title);
        title
    }

    /// The editing surface reported new content
    pub fn input(&mut self, content: String) {
        self.surface.replace(content);
        self.refresh_counts();
        self.save();
    }

    pub fn set_selection(&mut self, selection: Range<usize>) {
        self.surface.set_selection(selection);
    }

    /// Run a formatting command against the surface
    pub fn exec(&mut self, command: FormatCommand) {
        if self.surface.exec(command) {
            tracing::debug!("Applied {}", command);
        }
        self.refresh_counts();
        self.save();
    }

    /// Run a formatting command given by name
    pub fn exec_named(&mut self, name: &str) -> Result<(), UnknownCommand> {
        let command = name.parse::<FormatCommand>()?;
        self.exec(command);
        Ok(())
    }

    /// Handle a key chord; returns whether it mapped to a command
    pub fn shortcut(&mut self, modifier_held: bool, key: char) -> bool {
        match resolve_shortcut(modifier_held, key) {
            Some(command) => {
                self.exec(command);
                true
            }
            None => false,
        }
    }

    /// Persist the surface under the current document
    pub fn save(&mut self) {
        let Some(ref name) = self.current else {
            tracing::debug!("No document bound to the editor, not saving");
            return;
        };

        let document = Document::with_content(name, self.surface.content());
        match document.save(&mut self.storage) {
            Ok(()) => {
                tracing::debug!("Saved {} to {}", document.name, document.storage_key);
                if matches!(self.status, Some(ref s) if s.level == StatusLevel::Warning) {
                    self.status = None;
                }
            }
            Err(e) => {
                tracing::warn!("Failed to save {}: {}", document.name, e);
                self.status = Some(StatusMessage::warning(format!(
                    "Could not save \"{}\": {}",
                    document.name, e
                )));
            }
        }
    }

    /// Final flush before the application exits
    pub fn teardown(&mut self) {
        tracing::info!("Flushing session");
        self.save();
    }

    /// Plain-text rendition of the current document
    pub fn export(&self) -> ExportArtifact {
        ExportArtifact::new(self.current(), &self.surface.content())
    }

    fn activate_tab(&mut self, id: TabId) {
        if let Some(title) = self.tabs.activate(id) {
            let title = title.to_string();
            self.path_label = title.clone();
            self.current = Some(title);
        }
    }

    fn load_document(&mut self, name: &str) {
        let document = Document::read(name, &self.storage);
        self.surface.set_content(&document.body());

        self.current = Some(name.to_string());
        self.path_label = name.to_string();
        self.tabs.rename_active(name);
        self.tree.sync_active(name);
        self.refresh_counts();

        tracing::info!(
            "Loaded {} ({})",
            name,
            if document.content.is_some() { "stored" } else { "new" }
        );
    }

    fn refresh_counts(&mut self) {
        self.counts = TextCounts::of(&plain_text(&self.surface.content()));
    }
}
