use anyhow::Result;
use uuid::Uuid;

use super::collection::Collection;
use crate::database::{models::Notification, store::Storage};

const NOTIFICATIONS_KEY: &str = "medshift-notifications";

/// Newest first in storage
#[derive(Clone)]
pub struct NotificationRepository {
    collection: Collection<Notification>,
    max_entries: usize,
}

impl NotificationRepository {
    pub fn new(storage: Storage, max_entries: usize) -> Self {
        Self {
            collection: Collection::new(storage, NOTIFICATIONS_KEY),
            max_entries,
        }
    }

    pub async fn push(&self, notification: Notification) -> Result<()> {
        self.collection
            .prepend_capped(notification, self.max_entries)
            .await
    }

    pub async fn get_all(&self) -> Result<Vec<Notification>> {
        self.collection.get_all().await
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<Option<Notification>> {
        self.collection.update(id, |n| n.read = true).await
    }

    pub async fn mark_all_read(&self) -> Result<usize> {
        self.collection
            .modify(|items| {
                let mut changed = 0;
                for n in items.iter_mut().filter(|n| !n.read) {
                    n.read = true;
                    changed += 1;
                }
                Ok::<_, anyhow::Error>(changed)
            })
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.collection.delete(id).await
    }

    pub async fn clear(&self) -> Result<usize> {
        self.collection.clear().await
    }
}
