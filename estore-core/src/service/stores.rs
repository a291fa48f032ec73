//! Store service - CRUD pass-through, optionally scoped by establishment

use std::sync::Arc;

use tracing::debug;

use crate::context::Ctx;
use crate::error::Result;
use crate::model::{EstablishmentId, Store, StoreData, StoreId};
use crate::storage::StoreStorage;

#[derive(Clone)]
pub struct StoreService {
    storage: Arc<dyn StoreStorage>,
}

impl StoreService {
    pub fn new(storage: Arc<dyn StoreStorage>) -> Self {
        Self { storage }
    }

    pub async fn create(&self, ctx: &Ctx, data: &StoreData) -> Result<StoreId> {
        let id = ctx.run(self.storage.create(data)).await?;
        debug!(
            store_id = id,
            establishment_id = data.establishment_id,
            "store created"
        );
        Ok(id)
    }

    pub async fn find_all(&self, ctx: &Ctx) -> Result<Vec<Store>> {
        ctx.run(self.storage.find_all()).await
    }

    pub async fn find_by_id(&self, ctx: &Ctx, id: StoreId) -> Result<Option<Store>> {
        ctx.run(self.storage.find_by_id(id)).await
    }

    pub async fn find_by_establishment(
        &self,
        ctx: &Ctx,
        establishment_id: EstablishmentId,
    ) -> Result<Vec<Store>> {
        ctx.run(self.storage.find_by_establishment(establishment_id))
            .await
    }

    pub async fn update(&self, ctx: &Ctx, store: &Store) -> Result<()> {
        ctx.run(self.storage.update(store)).await?;
        debug!(store_id = store.id, "store updated");
        Ok(())
    }

    /// Stores have no dependents, so deletion is unconditional.
    pub async fn delete(&self, ctx: &Ctx, id: StoreId) -> Result<()> {
        ctx.run(self.storage.delete(id)).await?;
        debug!(store_id = id, "store deleted");
        Ok(())
    }
}
