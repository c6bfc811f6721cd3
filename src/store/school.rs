//! School record types

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A persisted school
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    /// Identifier assigned by storage on insert
    pub id: i64,
    pub name: String,
    pub address: String,
    /// Degrees, [-90, 90]
    pub latitude: f64,
    /// Degrees, [-180, 180]
    pub longitude: f64,
}

impl School {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// A validated school that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewSchool {
    pub name: String,
    pub address: String,
    pub location: GeoPoint,
}

impl NewSchool {
    /// Attach the storage-assigned id
    pub fn into_school(self, id: i64) -> School {
        School {
            id,
            name: self.name,
            address: self.address,
            latitude: self.location.latitude,
            longitude: self.location.longitude,
        }
    }
}
