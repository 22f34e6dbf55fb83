use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Notification, NotificationKind};
use crate::database::repositories::NotificationRepository;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

/// Superuser notification center
#[derive(Clone)]
pub struct NotificationService {
    repository: NotificationRepository,
}

impl NotificationService {
    pub fn new(repository: NotificationRepository) -> Self {
        Self { repository }
    }

    /// Failures are logged, never returned
    pub async fn notify(&self, kind: NotificationKind, now: NaiveDateTime) {
        let notification = Notification::new(kind, now);
        if let Err(e) = self.repository.push(notification).await {
            log::warn!("Failed to store notification: {:#}", e);
        }
    }

    pub async fn list(&self, unread_only: bool) -> Result<NotificationList, AppError> {
        let all = self.repository.get_all().await?;
        let unread_count = all.iter().filter(|n| !n.read).count();
        let notifications = if unread_only {
            all.into_iter().filter(|n| !n.read).collect()
        } else {
            all
        };

        Ok(NotificationList {
            notifications,
            unread_count,
        })
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<Notification, AppError> {
        self.repository
            .mark_read(id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification", &id.to_string()))
    }

    pub async fn mark_all_read(&self) -> Result<usize, AppError> {
        Ok(self.repository.mark_all_read().await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("Notification", &id.to_string()));
        }
        Ok(())
    }

    pub async fn clear(&self) -> Result<usize, AppError> {
        Ok(self.repository.clear().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::Storage;
    use pretty_assertions::assert_eq;

    fn at(hour: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn alert(message: &str) -> NotificationKind {
        NotificationKind::SystemAlert {
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn newest_first_and_capped() {
        let service = NotificationService::new(NotificationRepository::new(Storage::memory(), 2));
        service.notify(alert("one"), at(1)).await;
        service.notify(alert("two"), at(2)).await;
        service.notify(alert("three"), at(3)).await;

        let list = service.list(false).await.unwrap();
        assert_eq!(
            list.notifications.iter().map(|n| n.message.as_str()).collect::<Vec<_>>(),
            vec!["three", "two"]
        );
        assert_eq!(list.unread_count, 2);
    }

    #[tokio::test]
    async fn read_tracking() {
        let service = NotificationService::new(NotificationRepository::new(Storage::memory(), 10));
        service.notify(alert("one"), at(1)).await;
        service.notify(alert("two"), at(2)).await;

        let first = service.list(false).await.unwrap().notifications[0].clone();
        assert!(service.mark_read(first.id).await.unwrap().read);

        let unread = service.list(true).await.unwrap();
        assert_eq!(unread.unread_count, 1);
        assert_eq!(unread.notifications.len(), 1);
        assert_eq!(unread.notifications[0].message, "one");

        assert_eq!(service.mark_all_read().await.unwrap(), 1);
        assert_eq!(service.list(false).await.unwrap().unread_count, 0);

        service.delete(first.id).await.unwrap();
        assert!(matches!(service.delete(first.id).await, Err(AppError::NotFound(_))));
        assert_eq!(service.clear().await.unwrap(), 1);
        assert!(service.list(false).await.unwrap().notifications.is_empty());
    }
}
