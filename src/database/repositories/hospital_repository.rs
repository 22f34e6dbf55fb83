use anyhow::Result;
use tokio::sync::MutexGuard;
use uuid::Uuid;

use super::collection::Collection;
use crate::database::{models::Hospital, store::Storage};

/// Hospitals registered by one user
#[derive(Clone)]
pub struct HospitalRepository {
    collection: Collection<Hospital>,
}

impl HospitalRepository {
    pub fn new(storage: Storage, owner_id: Uuid) -> Self {
        Self {
            collection: Collection::new(storage, format!("medshift-hospitals:{}", owner_id)),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<Hospital>> {
        self.collection.get_all().await
    }

    pub async fn find_enabled(&self) -> Result<Vec<Hospital>> {
        self.collection.find(Hospital::is_enabled).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Hospital>> {
        self.collection.get_by_id(id).await
    }

    /// Caller holds the write lock, so the hospital cannot be deleted before
    /// the caller is done with it
    pub async fn find_by_id_with(&self, guard: &MutexGuard<'_, ()>, id: Uuid) -> Result<Option<Hospital>> {
        self.collection.get_by_id_with(guard, id).await
    }

    pub async fn create(&self, hospital: Hospital) -> Result<Hospital> {
        self.collection.create(hospital).await
    }

    pub async fn update(&self, id: Uuid, f: impl FnOnce(&mut Hospital)) -> Result<Option<Hospital>> {
        self.collection.update(id, f).await
    }

    /// Caller holds the write lock, see [`Collection::modify_with`]
    pub async fn delete_with(&self, guard: &MutexGuard<'_, ()>, id: Uuid) -> Result<bool> {
        self.collection.delete_with(guard, id).await
    }
}
