//! estore-server: storage and transport adapters for estore-core
//!
//! - [`db`]: PostgreSQL repositories implementing the core storage traits
//! - [`http`]: axum router mapping REST endpoints onto the core services

pub mod db;
pub mod http;

pub use db::{create_pool, create_pool_with_options, ensure_schema};
pub use http::{build_router, run_server, AppState, ServerConfig, StorageBackend};
