use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::database::models::{AuditAction, AuditLog, ClientInfo, User};
use crate::database::repositories::AuditLogRepository;
use crate::error::AppError;

/// Records who did what to which account. Recording failures are logged and
/// swallowed so that the audited operation itself never fails on them.
#[derive(Clone)]
pub struct AuditLogger {
    repository: AuditLogRepository,
}

impl AuditLogger {
    pub fn new(repository: AuditLogRepository) -> Self {
        Self { repository }
    }

    pub async fn log(
        &self,
        actor: &User,
        action: AuditAction,
        target: Option<&User>,
        details: impl Into<String>,
        client: &ClientInfo,
        now: NaiveDateTime,
    ) {
        let entry = AuditLog {
            id: Uuid::new_v4(),
            user_id: actor.id,
            user_email: actor.email.clone(),
            action,
            target_user_id: target.map(|t| t.id),
            target_email: target.map(|t| t.email.clone()),
            details: details.into(),
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
            timestamp: now,
        };

        if let Err(e) = self.repository.append(entry).await {
            log::warn!(
                "Failed to record audit entry {} for {}: {:#}",
                action,
                actor.email,
                e
            );
        }
    }

    /// Newest first
    pub async fn entries(&self) -> Result<Vec<AuditLog>, AppError> {
        Ok(self.repository.newest_first().await?)
    }
}
