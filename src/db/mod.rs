mod error;
mod memory;
mod models;
mod postgres;
mod repositories;
mod store;

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use tracing::info;

use crate::config::{Config, DatabaseConfig, StoreBackend};

pub use error::DatabaseError;
pub use memory::MemoryStore;
pub use models::*;
pub use postgres::PgStore;
pub use store::{BookingStore, SlotCheck};

/// Initialize the database connection pool and run pending migrations
pub async fn init_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let url = config
        .url
        .as_deref()
        .context("DATABASE_URL must be set for the postgres store")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections.unwrap_or(10))
        .min_connections(config.min_connections.unwrap_or(1))
        .connect(url)
        .await
        .context("Failed to connect to the database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(DatabaseError::from)
        .context("Failed to run migrations")?;

    Ok(pool)
}

/// Builds the store selected by `STORE_BACKEND`.
pub async fn connect(config: &Config) -> Result<Arc<dyn BookingStore>> {
    match config.app.store_backend {
        StoreBackend::Postgres => {
            let pool = init_pool(&config.database).await?;
            info!("Using postgres store");
            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            info!("Using in-memory store, data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
