//! estore-core: establishments, their stores, and the rules that keep them consistent
//!
//! The crate is storage-agnostic. Services talk to the capability traits in
//! [`storage`]; the PostgreSQL adapter lives in `estore-server` and
//! [`memory::MemoryStorage`] backs tests and database-less runs.

pub mod context;
pub mod error;
pub mod memory;
pub mod model;
pub mod service;
pub mod storage;

pub use context::{CancelHandle, Ctx};
pub use error::{CoreError, Result, StorageError, StorageErrorKind, StorageResult};
pub use memory::MemoryStorage;
pub use model::{
    Establishment, EstablishmentDetail, EstablishmentId, EstablishmentSummary, Profile, Store,
    StoreData, StoreId,
};
pub use service::{EstablishmentService, StoreService};
pub use storage::{EstablishmentStorage, StoreStorage};
