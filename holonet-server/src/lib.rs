//! holonet-server: catalog HTTP service
//!
//! Serves people and planets records plus a per-user favorites list
//! over a JSON HTTP API backed by SQLite.

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_memory_pool, create_pool};
pub use http::{build_router, run_server, seed_current_user, ApiError, AppState, ServerConfig};
pub use models::{Person, Planet, UserId};
