//! School Registry Service
//!
//! Registers schools with their coordinates and lists them by distance
//! from a caller-supplied point:
//! - Haversine great-circle distance
//! - Minimum-separation admission rule (50 m)
//! - SQLite or in-memory storage
//! - JSON over HTTP (axum)

pub mod config;
pub mod geo;
pub mod registry;
pub mod server;
pub mod store;

// Re-exports for convenience
pub use config::ServiceConfig;
pub use geo::{distance_meters, GeoPoint};
pub use registry::{RegistryError, SchoolRegistry, MIN_SEPARATION_METERS};
pub use store::{MemorySchoolStore, School, SchoolStore, SqliteSchoolStore};
