//! Storage capability traits
//!
//! Services depend on these traits only, so any backend that implements
//! them can be swapped in: PostgreSQL in production, [`MemoryStorage`] in
//! tests.
//!
//! Contract shared by every implementation:
//! - `find_by_id` returns `Ok(None)` when no row matches
//! - `update` and `delete` on a missing id are no-ops
//! - lists of stores come back ordered by id ascending
//!
//! [`MemoryStorage`]: crate::memory::MemoryStorage

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::model::{
    Establishment, EstablishmentId, EstablishmentSummary, Profile, Store, StoreData, StoreId,
};

#[async_trait]
pub trait EstablishmentStorage: Send + Sync {
    /// Insert a row and return the identity assigned by the backend.
    async fn create(&self, profile: &Profile) -> StorageResult<EstablishmentId>;

    async fn find_all(&self) -> StorageResult<Vec<Establishment>>;

    async fn find_by_id(&self, id: EstablishmentId) -> StorageResult<Option<Establishment>>;

    /// Overwrite every mutable field of the row matching `establishment.id`.
    async fn update(&self, establishment: &Establishment) -> StorageResult<()>;

    async fn delete(&self, id: EstablishmentId) -> StorageResult<()>;

    async fn count_stores_for_establishment(&self, id: EstablishmentId) -> StorageResult<i64>;

    async fn find_stores_for_establishment(&self, id: EstablishmentId)
        -> StorageResult<Vec<Store>>;

    /// Every establishment paired with its live store count, ordered by
    /// establishment id. Establishments without stores are included.
    async fn find_all_with_store_counts(&self) -> StorageResult<Vec<EstablishmentSummary>>;
}

#[async_trait]
pub trait StoreStorage: Send + Sync {
    /// Insert a row and return its identity. Fails with a constraint error
    /// when `data.establishment_id` does not reference an establishment.
    async fn create(&self, data: &StoreData) -> StorageResult<StoreId>;

    async fn find_all(&self) -> StorageResult<Vec<Store>>;

    async fn find_by_id(&self, id: StoreId) -> StorageResult<Option<Store>>;

    async fn update(&self, store: &Store) -> StorageResult<()>;

    async fn delete(&self, id: StoreId) -> StorageResult<()>;

    async fn find_by_establishment(&self, establishment_id: EstablishmentId)
        -> StorageResult<Vec<Store>>;
}
