use std::marker::PhantomData;

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::MutexGuard;
use uuid::Uuid;

use crate::database::{
    models::{AuditLog, Hospital, Notification, Shift, User},
    store::Storage,
};

/// Entities addressed by id inside a collection
pub trait Record {
    fn id(&self) -> Uuid;
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                fn id(&self) -> Uuid {
                    self.id
                }
            }
        )*
    };
}

impl_record!(Hospital, Shift, User, AuditLog, Notification);

/// A typed JSON array stored under a single key. Every mutation rewrites the
/// whole array while holding the store's write lock.
pub struct Collection<T> {
    storage: Storage,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(storage: Storage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            _marker: PhantomData,
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    async fn load(&self) -> Result<Vec<T>> {
        self.parse(self.storage.get(&self.key).await?)
    }

    /// Bypasses the read cache; used under the write lock
    async fn load_fresh(&self) -> Result<Vec<T>> {
        self.parse(self.storage.get_fresh(&self.key).await?)
    }

    fn parse(&self, raw: Option<String>) -> Result<Vec<T>> {
        match raw {
            None => Ok(Vec::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Corrupt collection under key {}", self.key)),
        }
    }

    async fn save(&self, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string(items)
            .with_context(|| format!("Failed to serialize collection {}", self.key))?;
        self.storage.set(&self.key, raw).await
    }

    /// Missing key reads as an empty collection
    pub async fn get_all(&self) -> Result<Vec<T>> {
        self.load().await
    }

    pub async fn find(&self, predicate: impl Fn(&T) -> bool) -> Result<Vec<T>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|item| predicate(item))
            .collect())
    }

    pub async fn find_one(&self, predicate: impl Fn(&T) -> bool) -> Result<Option<T>> {
        Ok(self.load().await?.into_iter().find(|item| predicate(item)))
    }

    pub async fn count(&self, predicate: impl Fn(&T) -> bool) -> Result<usize> {
        Ok(self.load().await?.iter().filter(|item| predicate(item)).count())
    }

    /// Current contents for a caller holding the write lock
    pub async fn get_all_with(&self, _guard: &MutexGuard<'_, ()>) -> Result<Vec<T>> {
        self.load_fresh().await
    }

    /// Load, mutate and save under the write lock. Nothing is written when
    /// `f` returns an error.
    pub async fn modify<R, E>(&self, f: impl FnOnce(&mut Vec<T>) -> Result<R, E>) -> Result<R, E>
    where
        E: From<anyhow::Error>,
    {
        let guard = self.storage.write_guard().await;
        self.modify_with(&guard, f).await
    }

    /// Same as [`Collection::modify`] for callers already holding the lock,
    /// e.g. to check another collection inside the same critical section.
    pub async fn modify_with<R, E>(
        &self,
        _guard: &MutexGuard<'_, ()>,
        f: impl FnOnce(&mut Vec<T>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<anyhow::Error>,
    {
        let mut items = self.load_fresh().await?;
        let result = f(&mut items)?;
        self.save(&items).await?;
        Ok(result)
    }

    pub async fn create(&self, item: T) -> Result<T> {
        self.modify(|items| {
            items.push(item.clone());
            Ok::<_, anyhow::Error>(item)
        })
        .await
    }

    /// Appends and drops the oldest entries beyond `cap`
    pub async fn append_capped(&self, item: T, cap: usize) -> Result<()> {
        self.modify(|items| {
            items.push(item);
            if items.len() > cap {
                let excess = items.len() - cap;
                items.drain(..excess);
            }
            Ok::<_, anyhow::Error>(())
        })
        .await
    }

    /// Inserts at the front and drops the oldest entries from the back beyond `cap`
    pub async fn prepend_capped(&self, item: T, cap: usize) -> Result<()> {
        self.modify(|items| {
            items.insert(0, item);
            items.truncate(cap);
            Ok::<_, anyhow::Error>(())
        })
        .await
    }

    pub async fn clear(&self) -> Result<usize> {
        self.modify(|items| {
            let removed = items.len();
            items.clear();
            Ok::<_, anyhow::Error>(removed)
        })
        .await
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone + Record,
{
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<T>> {
        self.find_one(|item| item.id() == id).await
    }

    pub async fn get_by_id_with(&self, guard: &MutexGuard<'_, ()>, id: Uuid) -> Result<Option<T>> {
        Ok(self
            .get_all_with(guard)
            .await?
            .into_iter()
            .find(|item| item.id() == id))
    }

    /// Applies `f` to the record with `id`; `None` when absent
    pub async fn update(&self, id: Uuid, f: impl FnOnce(&mut T)) -> Result<Option<T>> {
        self.modify(|items| {
            let updated = items.iter_mut().find(|item| item.id() == id).map(|item| {
                f(item);
                item.clone()
            });
            Ok::<_, anyhow::Error>(updated)
        })
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let guard = self.storage.write_guard().await;
        self.delete_with(&guard, id).await
    }

    pub async fn delete_with(&self, guard: &MutexGuard<'_, ()>, id: Uuid) -> Result<bool> {
        self.modify_with(guard, |items| {
            let before = items.len();
            items.retain(|item| item.id() != id);
            Ok::<_, anyhow::Error>(items.len() != before)
        })
        .await
    }
}
