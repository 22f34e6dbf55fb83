use anyhow::Result;
use chrono::NaiveDateTime;

use super::collection::Collection;
use crate::database::{
    models::{LoginAttempt, normalize_email},
    store::Storage,
};

const LOGIN_ATTEMPTS_KEY: &str = "medshift-login-attempts";

#[derive(Clone)]
pub struct LoginAttemptRepository {
    collection: Collection<LoginAttempt>,
    max_entries: usize,
}

impl LoginAttemptRepository {
    pub fn new(storage: Storage, max_entries: usize) -> Self {
        Self {
            collection: Collection::new(storage, LOGIN_ATTEMPTS_KEY),
            max_entries,
        }
    }

    pub async fn record(&self, attempt: LoginAttempt) -> Result<()> {
        self.collection
            .append_capped(attempt, self.max_entries)
            .await
    }

    /// Failed attempts for `email` strictly after `since`
    pub async fn failures_since(&self, email: &str, since: NaiveDateTime) -> Result<usize> {
        let email = normalize_email(email);
        self.collection
            .count(|a| !a.success && a.email == email && a.timestamp > since)
            .await
    }
}
