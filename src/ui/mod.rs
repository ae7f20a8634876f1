//! UI components for Tabfolio

pub mod editor;
pub mod file_tree;
pub mod status_bar;
pub mod tab_strip;
pub mod toolbar;
