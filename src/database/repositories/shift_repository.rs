use anyhow::Result;
use tokio::sync::MutexGuard;
use uuid::Uuid;

use super::collection::Collection;
use crate::database::{models::Shift, store::Storage};

/// Shifts logged by one user
#[derive(Clone)]
pub struct ShiftRepository {
    collection: Collection<Shift>,
}

impl ShiftRepository {
    pub fn new(storage: Storage, owner_id: Uuid) -> Self {
        Self {
            collection: Collection::new(storage, format!("medshift-shifts:{}", owner_id)),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<Shift>> {
        self.collection.get_all().await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Shift>> {
        self.collection.get_by_id(id).await
    }

    pub async fn get_all_with(&self, guard: &MutexGuard<'_, ()>) -> Result<Vec<Shift>> {
        self.collection.get_all_with(guard).await
    }

    pub async fn find_by_id_with(&self, guard: &MutexGuard<'_, ()>, id: Uuid) -> Result<Option<Shift>> {
        self.collection.get_by_id_with(guard, id).await
    }

    /// Caller holds the write lock, so no shift can be added in between
    pub async fn count_for_hospital_with(
        &self,
        guard: &MutexGuard<'_, ()>,
        hospital_id: Uuid,
    ) -> Result<usize> {
        Ok(self
            .get_all_with(guard)
            .await?
            .iter()
            .filter(|shift| shift.hospital_id == hospital_id)
            .count())
    }

    /// Runs `f` over the stored shifts and saves the result unless `f`
    /// fails. The overlap check and the insert happen here, under the lock
    /// the caller also used to look up the hospital.
    pub async fn modify_with<R, E>(
        &self,
        guard: &MutexGuard<'_, ()>,
        f: impl FnOnce(&mut Vec<Shift>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<anyhow::Error>,
    {
        self.collection.modify_with(guard, f).await
    }

    /// Store-wide write lock, held across the hospital lookup and the insert
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.collection.storage().write_guard().await
    }

    /// Caller holds the write lock, see [`ShiftRepository::lock`]
    pub async fn insert_with(&self, guard: &MutexGuard<'_, ()>, shift: Shift) -> Result<()> {
        self.collection
            .modify_with(guard, |shifts| {
                shifts.push(shift);
                Ok::<_, anyhow::Error>(())
            })
            .await
    }

    pub async fn update(&self, id: Uuid, f: impl FnOnce(&mut Shift)) -> Result<Option<Shift>> {
        self.collection.update(id, f).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.collection.delete(id).await
    }
}
