//! Terminal client for a self-hosted photo gallery.
//!
//! The `core` modules hold the gallery view state, filtering and viewer
//! navigation and never perform I/O.  `api` talks to the gallery server,
//! `app` wires both into an event loop and `ui` renders the result.

pub mod api;
pub mod app;
pub mod config;
pub mod core;
pub mod ui;
