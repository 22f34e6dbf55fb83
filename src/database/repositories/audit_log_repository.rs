use anyhow::Result;

use super::collection::Collection;
use crate::database::{models::AuditLog, store::Storage};

const AUDIT_LOGS_KEY: &str = "medshift-audit-logs";

/// Append-only, oldest first in storage
#[derive(Clone)]
pub struct AuditLogRepository {
    collection: Collection<AuditLog>,
    max_entries: usize,
}

impl AuditLogRepository {
    pub fn new(storage: Storage, max_entries: usize) -> Self {
        Self {
            collection: Collection::new(storage, AUDIT_LOGS_KEY),
            max_entries,
        }
    }

    pub async fn append(&self, log: AuditLog) -> Result<()> {
        self.collection.append_capped(log, self.max_entries).await
    }

    pub async fn newest_first(&self) -> Result<Vec<AuditLog>> {
        let mut logs = self.collection.get_all().await?;
        logs.reverse();
        Ok(logs)
    }
}
