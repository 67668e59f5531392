//! Core logic — data model, filtering, folder-tree walks, the gallery
//! controller and lightbox navigation.
//!
//! Nothing in this module depends on any TUI or rendering crate, and
//! nothing here performs I/O except the upload pre-flight `stat`.

pub mod error;
pub mod filter;
pub mod folders;
pub mod gallery;
pub mod model;
pub mod navigation;
pub mod upload;
pub mod zoom;
