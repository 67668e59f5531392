//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No network I/O happens here.

pub mod cursor;
pub mod filter_bar;
pub mod folder_tree;
pub mod halfblocks;
pub mod image_list;
pub mod layout;
pub mod lightbox;
pub mod popup;
pub mod screen;
pub mod spinner;
pub mod theme;
