//! Establishment service
//!
//! Besides plain CRUD this is where the composite reads are assembled and
//! where the delete guard lives.
//!
//! # Invariants
//! - An establishment that owns stores is never deleted through this service.
//! - Summary counts come from a single backend query, never from per-row
//!   lookups.
//!
//! The delete guard is check-then-act without a transaction. A store created
//! between the count and the delete is caught by the backend's foreign key,
//! not by the guard, and surfaces as a constraint [`StorageError`].
//!
//! [`StorageError`]: crate::error::StorageError

use std::sync::Arc;

use tracing::{debug, warn};

use crate::context::Ctx;
use crate::error::{CoreError, Result, HAS_STORES_REASON};
use crate::model::{Establishment, EstablishmentDetail, EstablishmentId, EstablishmentSummary, Profile};
use crate::storage::EstablishmentStorage;

#[derive(Clone)]
pub struct EstablishmentService {
    storage: Arc<dyn EstablishmentStorage>,
}

impl EstablishmentService {
    pub fn new(storage: Arc<dyn EstablishmentStorage>) -> Self {
        Self { storage }
    }

    pub async fn create(&self, ctx: &Ctx, profile: &Profile) -> Result<EstablishmentId> {
        let id = ctx.run(self.storage.create(profile)).await?;
        debug!(establishment_id = id, "establishment created");
        Ok(id)
    }

    pub async fn find_all(&self, ctx: &Ctx) -> Result<Vec<Establishment>> {
        ctx.run(self.storage.find_all()).await
    }

    pub async fn find_by_id(&self, ctx: &Ctx, id: EstablishmentId) -> Result<Option<Establishment>> {
        ctx.run(self.storage.find_by_id(id)).await
    }

    pub async fn update(&self, ctx: &Ctx, establishment: &Establishment) -> Result<()> {
        ctx.run(self.storage.update(establishment)).await?;
        debug!(establishment_id = establishment.id, "establishment updated");
        Ok(())
    }

    /// Every establishment with its store count, ordered by id.
    pub async fn list_summaries(&self, ctx: &Ctx) -> Result<Vec<EstablishmentSummary>> {
        ctx.run(self.storage.find_all_with_store_counts()).await
    }

    /// The establishment plus its stores.
    ///
    /// Two sequential reads. The store list may be slightly newer than the
    /// establishment row; a missing establishment never yields a partial
    /// result.
    pub async fn get_detail(&self, ctx: &Ctx, id: EstablishmentId) -> Result<EstablishmentDetail> {
        let establishment = ctx
            .run(self.storage.find_by_id(id))
            .await?
            .ok_or_else(|| CoreError::not_found("establishment", id))?;

        let stores = ctx.run(self.storage.find_stores_for_establishment(id)).await?;

        Ok(EstablishmentDetail {
            establishment,
            stores,
        })
    }

    /// Delete an establishment unless it still owns stores.
    ///
    /// Deleting an id that does not exist succeeds.
    pub async fn delete(&self, ctx: &Ctx, id: EstablishmentId) -> Result<()> {
        let stores_total = ctx
            .run(self.storage.count_stores_for_establishment(id))
            .await?;

        if stores_total > 0 {
            warn!(
                establishment_id = id,
                stores_total, "refusing to delete establishment with stores"
            );
            return Err(CoreError::conflict(HAS_STORES_REASON));
        }

        ctx.run(self.storage.delete(id)).await?;
        debug!(establishment_id = id, "establishment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageErrorKind;
    use crate::memory::MemoryStorage;
    use crate::model::StoreData;
    use crate::service::fakes::{profile, RecordingStorage};
    use crate::service::StoreService;
    use std::time::Duration;

    fn services() -> (EstablishmentService, StoreService) {
        let storage = Arc::new(MemoryStorage::new());
        (
            EstablishmentService::new(storage.clone()),
            StoreService::new(storage),
        )
    }

    async fn add_store(stores: &StoreService, establishment_id: EstablishmentId, name: &str) -> i64 {
        let data = StoreData {
            establishment_id,
            profile: profile(name),
        };
        stores.create(&Ctx::background(), &data).await.unwrap()
    }

    #[tokio::test]
    async fn delete_without_stores_removes_row() {
        let ctx = Ctx::background();
        let (establishments, _) = services();
        let id = establishments.create(&ctx, &profile("Solo")).await.unwrap();

        establishments.delete(&ctx, id).await.unwrap();

        assert!(establishments.find_by_id(&ctx, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_with_stores_is_conflict_and_keeps_row() {
        let ctx = Ctx::background();
        let (establishments, stores) = services();
        let id = establishments.create(&ctx, &profile("Busy")).await.unwrap();
        add_store(&stores, id, "kiosk").await;

        let err = establishments.delete(&ctx, id).await.unwrap_err();

        match err {
            CoreError::Conflict { reason } => assert_eq!(reason, HAS_STORES_REASON),
            other => panic!("expected conflict, got {other:?}"),
        }
        assert!(establishments.find_by_id(&ctx, id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn guard_skips_delete_call_on_conflict() {
        let fake = Arc::new(RecordingStorage::with_store_count(2));
        let service = EstablishmentService::new(fake.clone());

        let err = service.delete(&Ctx::background(), 1).await.unwrap_err();

        assert!(matches!(err, CoreError::Conflict { .. }));
        assert!(!fake.delete_called());
    }

    #[tokio::test]
    async fn cancel_between_count_and_delete_skips_delete() {
        let (ctx, handle) = Ctx::cancellable();
        let fake = Arc::new(RecordingStorage::canceling_on_count(handle));
        let service = EstablishmentService::new(fake.clone());

        let err = service.delete(&ctx, 1).await.unwrap_err();

        assert!(matches!(err, CoreError::Canceled));
        assert_eq!(fake.calls(), vec!["count_stores_for_establishment"]);
        assert!(!fake.delete_called());
    }

    #[tokio::test]
    async fn guard_propagates_count_failure_unchanged() {
        let fake = Arc::new(RecordingStorage::failing());
        let service = EstablishmentService::new(fake.clone());

        let err = service.delete(&Ctx::background(), 1).await.unwrap_err();

        match err {
            CoreError::Storage(e) => assert_eq!(e.kind(), StorageErrorKind::Backend),
            other => panic!("expected storage error, got {other:?}"),
        }
        assert!(!fake.delete_called());
    }

    #[tokio::test]
    async fn delete_twice_is_noop() {
        let ctx = Ctx::background();
        let (establishments, _) = services();
        let id = establishments.create(&ctx, &profile("Twice")).await.unwrap();

        establishments.delete(&ctx, id).await.unwrap();
        establishments.delete(&ctx, id).await.unwrap();
    }

    #[tokio::test]
    async fn summaries_count_stores_per_establishment() {
        let ctx = Ctx::background();
        let (establishments, stores) = services();
        let a = establishments.create(&ctx, &profile("A")).await.unwrap();
        let b = establishments.create(&ctx, &profile("B")).await.unwrap();
        for name in ["s1", "s2", "s3"] {
            add_store(&stores, b, name).await;
        }

        let summaries = establishments.list_summaries(&ctx).await.unwrap();

        let total_of = |id| {
            summaries
                .iter()
                .find(|s| s.establishment.id == id)
                .map(|s| s.stores_total)
        };
        assert_eq!(total_of(a), Some(0));
        assert_eq!(total_of(b), Some(3));
    }

    #[tokio::test]
    async fn summaries_use_single_backend_query() {
        let fake = Arc::new(RecordingStorage::with_store_count(0));
        let service = EstablishmentService::new(fake.clone());

        service.list_summaries(&Ctx::background()).await.unwrap();

        assert_eq!(fake.calls(), vec!["find_all_with_store_counts"]);
    }

    #[tokio::test]
    async fn detail_of_missing_establishment_is_not_found() {
        let (establishments, _) = services();

        let err = establishments
            .get_detail(&Ctx::background(), 404)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::NotFound {
                resource: "establishment",
                id: 404
            }
        ));
    }

    #[tokio::test]
    async fn detail_lists_stores_by_ascending_id() {
        let ctx = Ctx::background();
        let (establishments, stores) = services();
        let id = establishments.create(&ctx, &profile("Mall")).await.unwrap();
        let other = establishments.create(&ctx, &profile("Other")).await.unwrap();
        let s1 = add_store(&stores, id, "first").await;
        add_store(&stores, other, "elsewhere").await;
        let s2 = add_store(&stores, id, "second").await;

        let detail = establishments.get_detail(&ctx, id).await.unwrap();

        let ids: Vec<_> = detail.stores.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![s1, s2]);
        assert_eq!(detail.establishment.profile.name, "Mall");
    }

    #[tokio::test]
    async fn update_overwrites_profile() {
        let ctx = Ctx::background();
        let (establishments, _) = services();
        let id = establishments.create(&ctx, &profile("Old")).await.unwrap();

        let renamed = Establishment {
            id,
            profile: profile("New"),
        };
        establishments.update(&ctx, &renamed).await.unwrap();

        let found = establishments.find_by_id(&ctx, id).await.unwrap();
        assert_eq!(found, Some(renamed));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_context_cancels_detail_read() {
        let fake = Arc::new(RecordingStorage::slow(Duration::from_secs(5)));
        let service = EstablishmentService::new(fake);

        let ctx = Ctx::with_timeout(Duration::from_millis(100));
        let err = service.get_detail(&ctx, 1).await.unwrap_err();

        assert!(matches!(err, CoreError::Canceled));
    }
}
