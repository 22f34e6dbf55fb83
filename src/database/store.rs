//! Key/value persistence for JSON collection blobs.
//!
//! Every collection lives under one key as a serialized JSON array. The store
//! itself knows nothing about the payloads; typed access is provided by
//! [`crate::database::repositories::Collection`].

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use moka::future::Cache;
use sqlx::PgPool;
use tokio::sync::{Mutex, MutexGuard, RwLock};

#[derive(Clone)]
enum Backend {
    Memory(Arc<RwLock<HashMap<String, String>>>),
    File(PathBuf),
    Postgres(PgPool),
}

#[derive(Clone)]
pub struct Storage {
    backend: Backend,
    /// Read cache in front of the remote backend
    cache: Option<Cache<String, Arc<String>>>,
    /// Serializes every read-modify-write cycle across the whole store
    write_lock: Arc<Mutex<()>>,
}

impl Storage {
    fn with_backend(backend: Backend, cache: Option<Cache<String, Arc<String>>>) -> Self {
        Self {
            backend,
            cache,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn memory() -> Self {
        Self::with_backend(Backend::Memory(Arc::new(RwLock::new(HashMap::new()))), None)
    }

    pub async fn file(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

        Ok(Self::with_backend(Backend::File(dir), None))
    }

    pub fn postgres(pool: PgPool, cache_ttl_seconds: u64) -> Self {
        Self::with_backend(Backend::Postgres(pool), None).with_read_cache(cache_ttl_seconds)
    }

    /// Puts a TTL read cache in front of the backend; `0` disables it.
    /// Unlocked reads may see a value up to `ttl_seconds` old, reads made
    /// under the write lock never do.
    pub fn with_read_cache(mut self, ttl_seconds: u64) -> Self {
        self.cache = (ttl_seconds > 0).then(|| {
            Cache::builder()
                .max_capacity(1_000)
                .time_to_live(Duration::from_secs(ttl_seconds))
                .build()
        });
        self
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory(_) => "memory",
            Backend::File(_) => "file",
            Backend::Postgres(_) => "postgres",
        }
    }

    /// Holds the store-wide write lock. Callers keep the guard for the whole
    /// load/mutate/save cycle of a collection.
    pub async fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(key).await {
                return Ok(Some(hit.as_ref().clone()));
            }
        }

        let value = self.get_fresh(key).await?;

        if let (Some(cache), Some(value)) = (&self.cache, &value) {
            cache.insert(key.to_string(), Arc::new(value.clone())).await;
        }

        Ok(value)
    }

    /// Reads the backend and bypasses the cache. Read-modify-write cycles
    /// must use this so a stale cache entry is never written back.
    pub async fn get_fresh(&self, key: &str) -> Result<Option<String>> {
        let value = match &self.backend {
            Backend::Memory(map) => map.read().await.get(key).cloned(),
            Backend::File(dir) => read_file(&file_path(dir, key)).await?,
            Backend::Postgres(pool) => {
                sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = $1")
                    .bind(key)
                    .fetch_optional(pool)
                    .await?
            }
        };

        Ok(value)
    }

    /// The cache entry is dropped only after the backend write succeeded
    pub async fn set(&self, key: &str, value: String) -> Result<()> {
        match &self.backend {
            Backend::Memory(map) => {
                map.write().await.insert(key.to_string(), value);
            }
            Backend::File(dir) => write_file(&file_path(dir, key), &value).await?,
            Backend::Postgres(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO kv_store (key, value, updated_at)
                    VALUES ($1, $2, NOW())
                    ON CONFLICT (key) DO UPDATE
                    SET value = EXCLUDED.value, updated_at = NOW()
                    "#,
                )
                .bind(key)
                .bind(value)
                .execute(pool)
                .await?;
            }
        }

        if let Some(cache) = &self.cache {
            cache.invalidate(key).await;
        }

        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        match &self.backend {
            Backend::Memory(map) => {
                map.write().await.remove(key);
            }
            Backend::File(dir) => {
                let path = file_path(dir, key);
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => {
                        return Err(e)
                            .with_context(|| format!("Failed to remove {}", path.display()));
                    }
                }
            }
            Backend::Postgres(pool) => {
                sqlx::query("DELETE FROM kv_store WHERE key = $1")
                    .bind(key)
                    .execute(pool)
                    .await?;
            }
        }

        if let Some(cache) = &self.cache {
            cache.invalidate(key).await;
        }

        Ok(())
    }
}

/// Keys contain `:` and uuids; anything outside `[A-Za-z0-9_-]` becomes `_`.
fn file_path(dir: &Path, key: &str) -> PathBuf {
    let name: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    dir.join(format!("{}.json", name))
}

async fn read_file(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

async fn write_file(path: &Path, value: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, value)
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}
