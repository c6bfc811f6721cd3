//! Storage Module
//!
//! The record collection behind the registry: a flat list of schools that
//! can be read in full and appended to.

pub mod school;
pub mod sqlite;
pub mod memory;

pub use school::{NewSchool, School};
pub use sqlite::SqliteSchoolStore;
pub use memory::MemorySchoolStore;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::StorageConfig;
use crate::geo::GeoPoint;

/// Trait for school storage backends
#[async_trait]
pub trait SchoolStore: Send + Sync {
    /// Coordinates of every stored school
    async fn list_coordinates(&self) -> Result<Vec<GeoPoint>>;

    /// Every stored school, in insertion order
    async fn list_all(&self) -> Result<Vec<School>>;

    /// Store a school and return its generated identifier
    async fn insert(&self, school: &NewSchool) -> Result<i64>;
}

/// Build the backend selected by configuration.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn SchoolStore>> {
    match config {
        StorageConfig::Sqlite(path) => {
            let store = SqliteSchoolStore::open(path).await?;
            info!("📚 Schools stored in {}", store.location().display());
            Ok(Arc::new(store))
        }
        StorageConfig::InMemory => {
            warn!("Using in-memory storage; schools are lost on exit");
            Ok(Arc::new(MemorySchoolStore::new()))
        }
    }
}
