//! In-memory storage backend
//!
//! Implements both storage traits over a pair of ordered maps behind one
//! lock. Mirrors the relational schema closely enough to test services
//! against: ids start at 1 and are never reused, a store must reference an
//! existing establishment, and an establishment that still owns stores
//! cannot be removed.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{StorageError, StorageResult};
use crate::model::{
    Establishment, EstablishmentId, EstablishmentSummary, Profile, Store, StoreData, StoreId,
};
use crate::storage::{EstablishmentStorage, StoreStorage};

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("establishment {0} does not exist")]
    UnknownEstablishment(EstablishmentId),

    #[error("establishment {0} is still referenced by stores")]
    StillReferenced(EstablishmentId),

    #[error("storage lock poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
struct Tables {
    last_establishment_id: EstablishmentId,
    last_store_id: StoreId,
    establishments: BTreeMap<EstablishmentId, Profile>,
    stores: BTreeMap<StoreId, StoreData>,
}

impl Tables {
    fn stores_of(&self, establishment_id: EstablishmentId) -> impl Iterator<Item = Store> + '_ {
        self.stores
            .iter()
            .filter(move |(_, data)| data.establishment_id == establishment_id)
            .map(|(id, data)| Store {
                id: *id,
                data: data.clone(),
            })
    }

    fn require_establishment(&self, id: EstablishmentId) -> StorageResult<()> {
        if self.establishments.contains_key(&id) {
            Ok(())
        } else {
            Err(StorageError::constraint(MemoryError::UnknownEstablishment(id)))
        }
    }
}

/// Storage backend holding everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: Mutex<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> StorageResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StorageError::backend(MemoryError::Poisoned))
    }
}

#[async_trait]
impl EstablishmentStorage for MemoryStorage {
    async fn create(&self, profile: &Profile) -> StorageResult<EstablishmentId> {
        let mut tables = self.tables()?;
        tables.last_establishment_id += 1;
        let id = tables.last_establishment_id;
        tables.establishments.insert(id, profile.clone());
        Ok(id)
    }

    async fn find_all(&self) -> StorageResult<Vec<Establishment>> {
        let tables = self.tables()?;
        Ok(tables
            .establishments
            .iter()
            .map(|(id, profile)| Establishment {
                id: *id,
                profile: profile.clone(),
            })
            .collect())
    }

    async fn find_by_id(&self, id: EstablishmentId) -> StorageResult<Option<Establishment>> {
        let tables = self.tables()?;
        Ok(tables.establishments.get(&id).map(|profile| Establishment {
            id,
            profile: profile.clone(),
        }))
    }

    async fn update(&self, establishment: &Establishment) -> StorageResult<()> {
        let mut tables = self.tables()?;
        if let Some(profile) = tables.establishments.get_mut(&establishment.id) {
            *profile = establishment.profile.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: EstablishmentId) -> StorageResult<()> {
        let mut tables = self.tables()?;
        if tables.stores_of(id).next().is_some() {
            return Err(StorageError::constraint(MemoryError::StillReferenced(id)));
        }
        tables.establishments.remove(&id);
        Ok(())
    }

    async fn count_stores_for_establishment(&self, id: EstablishmentId) -> StorageResult<i64> {
        let tables = self.tables()?;
        Ok(tables.stores_of(id).count() as i64)
    }

    async fn find_stores_for_establishment(
        &self,
        id: EstablishmentId,
    ) -> StorageResult<Vec<Store>> {
        let tables = self.tables()?;
        Ok(tables.stores_of(id).collect())
    }

    async fn find_all_with_store_counts(&self) -> StorageResult<Vec<EstablishmentSummary>> {
        let tables = self.tables()?;

        let mut totals: BTreeMap<EstablishmentId, i64> = BTreeMap::new();
        for data in tables.stores.values() {
            *totals.entry(data.establishment_id).or_default() += 1;
        }

        Ok(tables
            .establishments
            .iter()
            .map(|(id, profile)| EstablishmentSummary {
                establishment: Establishment {
                    id: *id,
                    profile: profile.clone(),
                },
                stores_total: totals.get(id).copied().unwrap_or(0),
            })
            .collect())
    }
}

#[async_trait]
impl StoreStorage for MemoryStorage {
    async fn create(&self, data: &StoreData) -> StorageResult<StoreId> {
        let mut tables = self.tables()?;
        tables.require_establishment(data.establishment_id)?;
        tables.last_store_id += 1;
        let id = tables.last_store_id;
        tables.stores.insert(id, data.clone());
        Ok(id)
    }

    async fn find_all(&self) -> StorageResult<Vec<Store>> {
        let tables = self.tables()?;
        Ok(tables
            .stores
            .iter()
            .map(|(id, data)| Store {
                id: *id,
                data: data.clone(),
            })
            .collect())
    }

    async fn find_by_id(&self, id: StoreId) -> StorageResult<Option<Store>> {
        let tables = self.tables()?;
        Ok(tables.stores.get(&id).map(|data| Store {
            id,
            data: data.clone(),
        }))
    }

    async fn update(&self, store: &Store) -> StorageResult<()> {
        let mut tables = self.tables()?;
        if !tables.stores.contains_key(&store.id) {
            return Ok(());
        }
        tables.require_establishment(store.data.establishment_id)?;
        tables.stores.insert(store.id, store.data.clone());
        Ok(())
    }

    async fn delete(&self, id: StoreId) -> StorageResult<()> {
        self.tables()?.stores.remove(&id);
        Ok(())
    }

    async fn find_by_establishment(
        &self,
        establishment_id: EstablishmentId,
    ) -> StorageResult<Vec<Store>> {
        let tables = self.tables()?;
        Ok(tables.stores_of(establishment_id).collect())
    }
}
