//! Session state: documents, storage, file tree, tabs and the controller tying them together

pub mod config;
pub mod document;
pub mod file_tree;
pub mod format;
pub mod session;
pub mod storage;
pub mod surface;
pub mod tabs;
