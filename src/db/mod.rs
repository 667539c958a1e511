mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repositories;
pub mod store;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::{DatabaseConfig, StoreBackend};

pub use error::DatabaseError;
pub use memory::MemoryStore;
pub use models::*;
pub use postgres::PgDocumentStore;
pub use store::{Document, DocumentStore, Filter, Patch};

/// Build the configured document store
pub async fn init_store(config: &DatabaseConfig) -> Result<Arc<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory document store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let store = PgDocumentStore::connect(config).await?;
            info!("Connected to Postgres document store");
            Ok(Arc::new(store))
        }
    }
}
