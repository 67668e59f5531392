//! Application orchestration — state, input handling and the request runtime.

pub mod api_runtime;
pub mod event;
pub mod handler;
pub mod state;
