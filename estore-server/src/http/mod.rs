//! HTTP transport layer
//!
//! Axum server with:
//! - CORS (localhost only by default)
//! - Request tracing
//! - Per-request deadline carried into every core call
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;
pub mod validation;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError, StorageBackend};
pub use validation::{Validate, ValidationErrors};
