//! Database layer - connection pool, schema bootstrap, repositories
//!
//! # Design Principles
//!
//! - One pool per process, built at startup and handed to each repository
//! - Summary listing is a single LEFT JOIN - no N+1 queries
//! - Constraint violations reported by PostgreSQL are classified, not masked

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::{EstablishmentRepo, StoreRepo};
pub use schema::ensure_schema;
