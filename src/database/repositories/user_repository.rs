use anyhow::Result;
use uuid::Uuid;

use super::collection::Collection;
use crate::database::{
    models::{User, normalize_email},
    store::Storage,
};

const USERS_KEY: &str = "medshift-users";

#[derive(Clone)]
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(storage: Storage) -> Self {
        Self {
            collection: Collection::new(storage, USERS_KEY),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<User>> {
        self.collection.get_all().await
    }

    pub async fn count(&self) -> Result<usize> {
        self.collection.count(|_| true).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.collection.get_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email);
        self.collection.find_one(|user| user.email == email).await
    }

    /// Inserts `user` unless the email is already taken. Returns `None` on a
    /// duplicate.
    pub async fn create(&self, user: User) -> Result<Option<User>> {
        self.collection
            .modify(|users| {
                if users.iter().any(|u| u.email == user.email) {
                    return Ok::<_, anyhow::Error>(None);
                }
                users.push(user.clone());
                Ok(Some(user))
            })
            .await
    }

    /// Inserts `user` only when there are no users yet
    pub async fn create_if_empty(&self, user: User) -> Result<bool> {
        self.collection
            .modify(|users| {
                if !users.is_empty() {
                    return Ok::<_, anyhow::Error>(false);
                }
                users.push(user);
                Ok(true)
            })
            .await
    }

    /// Checks and changes that span several users, e.g. email uniqueness,
    /// made atomically under the write lock
    pub async fn modify<R, E>(&self, f: impl FnOnce(&mut Vec<User>) -> Result<R, E>) -> Result<R, E>
    where
        E: From<anyhow::Error>,
    {
        self.collection.modify(f).await
    }

    pub async fn update(&self, id: Uuid, f: impl FnOnce(&mut User)) -> Result<Option<User>> {
        self.collection.update(id, f).await
    }
}
