//! Route handlers organized by resource

pub mod docs;
pub mod establishments;
pub mod health;
pub mod stores;

use serde::Serialize;

/// Acknowledgement body for writes that return no record
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Acknowledgement body for creates that return only the new id
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: i64,
}
