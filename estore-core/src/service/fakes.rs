//! Hand-written storage fakes for failure injection in service tests

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::context::CancelHandle;
use crate::error::{StorageError, StorageResult};
use crate::model::{Establishment, EstablishmentId, EstablishmentSummary, Profile, Store};
use crate::storage::EstablishmentStorage;

pub(crate) fn profile(name: &str) -> Profile {
    Profile {
        number: "0001".into(),
        name: name.into(),
        corporate_name: format!("{name} Ltda"),
        address: "Av. Boa Viagem".into(),
        address_number: "100".into(),
        city: "Recife".into(),
        state: "PE".into(),
        zip_code: "51020-000".into(),
    }
}

enum Behaviour {
    Count(i64),
    Fail,
    Slow(Duration),
    CancelOnCount(CancelHandle),
}

/// Establishment storage that records which operations were called.
pub(crate) struct RecordingStorage {
    behaviour: Behaviour,
    calls: Mutex<Vec<&'static str>>,
}

impl RecordingStorage {
    /// Reports `count` stores for every establishment.
    pub(crate) fn with_store_count(count: i64) -> Self {
        Self::new(Behaviour::Count(count))
    }

    /// Every operation fails with a backend error.
    pub(crate) fn failing() -> Self {
        Self::new(Behaviour::Fail)
    }

    /// Every operation sleeps for `delay` before answering.
    pub(crate) fn slow(delay: Duration) -> Self {
        Self::new(Behaviour::Slow(delay))
    }

    /// Cancels `handle` while answering the store count (with zero stores).
    pub(crate) fn canceling_on_count(handle: CancelHandle) -> Self {
        Self::new(Behaviour::CancelOnCount(handle))
    }

    fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn delete_called(&self) -> bool {
        self.calls().contains(&"delete")
    }

    async fn enter(&self, op: &'static str) -> StorageResult<()> {
        self.calls.lock().unwrap().push(op);
        match &self.behaviour {
            Behaviour::Count(_) | Behaviour::CancelOnCount(_) => Ok(()),
            Behaviour::Fail => Err(StorageError::backend(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "connection lost",
            ))),
            Behaviour::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(())
            }
        }
    }

    fn store_count(&self) -> i64 {
        match &self.behaviour {
            Behaviour::Count(count) => *count,
            _ => 0,
        }
    }
}

#[async_trait]
impl EstablishmentStorage for RecordingStorage {
    async fn create(&self, _profile: &Profile) -> StorageResult<EstablishmentId> {
        self.enter("create").await?;
        Ok(1)
    }

    async fn find_all(&self) -> StorageResult<Vec<Establishment>> {
        self.enter("find_all").await?;
        Ok(Vec::new())
    }

    async fn find_by_id(&self, id: EstablishmentId) -> StorageResult<Option<Establishment>> {
        self.enter("find_by_id").await?;
        Ok(Some(Establishment {
            id,
            profile: profile("Recorded"),
        }))
    }

    async fn update(&self, _establishment: &Establishment) -> StorageResult<()> {
        self.enter("update").await
    }

    async fn delete(&self, _id: EstablishmentId) -> StorageResult<()> {
        self.enter("delete").await
    }

    async fn count_stores_for_establishment(&self, _id: EstablishmentId) -> StorageResult<i64> {
        self.enter("count_stores_for_establishment").await?;
        if let Behaviour::CancelOnCount(handle) = &self.behaviour {
            handle.cancel();
        }
        Ok(self.store_count())
    }

    async fn find_stores_for_establishment(
        &self,
        _id: EstablishmentId,
    ) -> StorageResult<Vec<Store>> {
        self.enter("find_stores_for_establishment").await?;
        Ok(Vec::new())
    }

    async fn find_all_with_store_counts(&self) -> StorageResult<Vec<EstablishmentSummary>> {
        self.enter("find_all_with_store_counts").await?;
        Ok(Vec::new())
    }
}
