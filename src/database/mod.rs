use anyhow::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::{Config, StorageBackend};

pub mod models;
pub mod repositories;
pub mod store;

pub use store::Storage;

pub async fn init_database(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Migrations completed successfully");

    Ok(pool)
}

/// Opens the store selected by `STORAGE_BACKEND`
pub async fn init_storage(config: &Config) -> Result<Storage> {
    let storage = match config.storage_backend {
        StorageBackend::Memory => {
            log::warn!("Using in-memory storage; data is lost on restart");
            Storage::memory()
        }
        StorageBackend::File => Storage::file(config.data_dir.clone()).await?,
        StorageBackend::Postgres => {
            let pool = init_database(&config.database_url).await?;
            Storage::postgres(pool, config.storage_cache_seconds)
        }
    };

    log::info!("Storage initialized (backend: {})", storage.backend_name());
    Ok(storage)
}
