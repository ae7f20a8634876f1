//! Application configuration management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::file_tree::TreeEntry;
use super::tabs::TabEntry;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Editor settings
    pub editor: EditorConfig,
    /// Session behaviour
    pub session: SessionConfig,
    /// Document store settings
    pub storage: StorageConfig,
    /// Initial file tree layout
    pub tree: Vec<TreeEntry>,
    /// Tabs open at startup
    pub tabs: Vec<TabEntry>,
}

/// Editor-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Font size in pixels
    pub font_size: f32,
    /// Rows the editing surface reserves before scrolling
    pub desired_rows: usize,
}

/// How the session names, files and recovers documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Document opened when neither the tree nor the tabs mark one active
    pub fallback_title: String,
    /// Prefix for new documents, numbered from 1
    pub untitled_prefix: String,
    /// New documents are filed under the first folder whose label starts with this
    pub untitled_folder: String,
    /// Open a fresh untitled document when the last tab is closed
    pub keep_one_tab_open: bool,
}

/// Document store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Maximum bytes the store may hold (None = unlimited)
    pub quota_bytes: Option<usize>,
    /// Store file location override
    pub store_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            session: SessionConfig::default(),
            storage: StorageConfig::default(),
            tree: default_tree(),
            tabs: vec![
                TabEntry {
                    title: "Chapter 1".to_string(),
                    active: false,
                },
                TabEntry {
                    title: "Chapter 2".to_string(),
                    active: true,
                },
            ],
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            desired_rows: 30,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fallback_title: "Chapter 2".to_string(),
            untitled_prefix: "Untitled".to_string(),
            untitled_folder: "Writing".to_string(),
            keep_one_tab_open: true,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            // Same budget browsers give local storage
            quota_bytes: Some(5 * 1024 * 1024),
            store_file: None,
        }
    }
}

fn default_tree() -> Vec<TreeEntry> {
    vec![
        TreeEntry::folder(
            "Writing",
            true,
            vec![
                TreeEntry::file("Chapter 1"),
                TreeEntry::active_file("Chapter 2"),
                TreeEntry::file("Chapter 3"),
            ],
        ),
        TreeEntry::folder(
            "Research",
            false,
            vec![TreeEntry::file("Notes"), TreeEntry::file("Characters")],
        ),
        TreeEntry::file("Ideas"),
    ]
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "tabfolio", "Tabfolio")
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config: {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to replace config: {}", path.display()))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Where the document store lives
    pub fn store_path(&self) -> PathBuf {
        self.storage.store_file.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.data_dir().join("store.json"))
                .unwrap_or_else(|| PathBuf::from("store.json"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "session": { "untitled_prefix": "Draft" } }"#).unwrap();
        assert_eq!(config.session.untitled_prefix, "Draft");
        assert_eq!(config.session.untitled_folder, "Writing");
        assert!(config.session.keep_one_tab_open);
        assert_eq!(config.tree, default_tree());
    }

    #[test]
    fn test_tree_layout_from_json() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "tree": [
                    { "kind": "folder", "label": "Drafts", "children": [
                        { "kind": "file", "label": "Opening", "active": true }
                    ] }
                ],
                "storage": { "quota_bytes": null }
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.tree,
            vec![TreeEntry::folder("Drafts", false, vec![TreeEntry::active_file("Opening")])]
        );
        assert_eq!(config.storage.quota_bytes, None);
    }

    #[test]
    fn test_save_to_then_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("config.json");
        assert_eq!(AppConfig::load_from(&path).unwrap().tabs, AppConfig::default().tabs);

        let mut config = AppConfig::default();
        config.tabs = vec![TabEntry {
            title: "Epilogue".to_string(),
            active: true,
        }];
        config.save_to(&path).unwrap();
        assert!(!path.with_extension("tmp").exists());

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.tabs, config.tabs);
    }

    #[test]
    fn test_load_from_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid config"));
    }

    #[test]
    fn test_store_path_override() {
        let mut config = AppConfig::default();
        config.storage.store_file = Some(PathBuf::from("/tmp/docs.json"));
        assert_eq!(config.store_path(), PathBuf::from("/tmp/docs.json"));
    }
}
