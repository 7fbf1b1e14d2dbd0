//! WDBC inference daemon: library interface.
//!
//! Exposes the router, handlers and state so integration tests can drive
//! the HTTP surface in-process.

pub mod api;
pub mod config;
pub mod server;

pub use api::{health_handler, predict_handler, ApiError, AppState};
pub use config::ServerConfig;
pub use server::{build_app_state, build_router, run, serve, shutdown_signal};
