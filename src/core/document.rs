//! Document identity and persisted content

use super::storage::{storage_key, StorageAdapter, StorageError};

/// A named document and its stored markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Display title, also the identity of the document
    pub name: String,
    /// Store key derived from `name`
    pub storage_key: String,
    /// Stored markup, `None` when nothing was ever saved
    pub content: Option<String>,
}

impl Document {
    /// Create a document with no stored content
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            storage_key: storage_key(name),
            content: None,
        }
    }

    /// Create a document holding `content`
    pub fn with_content(name: &str, content: String) -> Self {
        Self {
            content: Some(content),
            ..Self::new(name)
        }
    }

    /// Read a document from storage
    pub fn read(name: &str, storage: &StorageAdapter) -> Self {
        Self {
            content: storage.read(name),
            ..Self::new(name)
        }
    }

    /// Markup shown for a document that was never saved
    pub fn default_content(name: &str) -> String {
        format!("# {}\n\nStart writing here…\n", name)
    }

    /// Stored content, or the default for this name
    pub fn body(&self) -> String {
        self.content
            .clone()
            .unwrap_or_else(|| Self::default_content(&self.name))
    }

    /// Write the content to storage; a document without content writes nothing
    pub fn save(&self, storage: &mut StorageAdapter) -> Result<(), StorageError> {
        match self.content {
            Some(ref content) => storage.write(&self.name, content),
            None => Ok(()),
        }
    }
}
