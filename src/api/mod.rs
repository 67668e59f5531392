//! Remote gallery API — the folder and image repositories the controller
//! consumes.

pub mod client;

pub use client::ApiClient;
