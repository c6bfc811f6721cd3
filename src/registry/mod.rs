//! School Registry
//!
//! Admission of new schools under the minimum-separation rule, and ranking
//! of stored schools by distance from a query point. Both are linear scans
//! over every stored record.

pub mod error;

pub use error::RegistryError;

use error::{
    MSG_COORDS_NOT_NUMBERS, MSG_COORDS_OUT_OF_RANGE, MSG_FIELDS_REQUIRED, MSG_QUERY_INVALID,
    MSG_QUERY_REQUIRED, MSG_TEXT_FIELDS,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::geo::GeoPoint;
use crate::store::{NewSchool, School, SchoolStore};

/// New schools closer than this to an existing one are rejected.
pub const MIN_SEPARATION_METERS: f64 = 50.0;

/// Admission input as it arrives from a client, before validation.
///
/// Fields are kept loosely typed so that a wrong type is reported as a
/// validation failure instead of a decoding failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchoolCandidate {
    pub name: Option<Value>,
    pub address: Option<Value>,
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
}

impl SchoolCandidate {
    pub fn new(name: &str, address: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            name: Some(Value::from(name)),
            address: Some(Value::from(address)),
            latitude: Some(Value::from(latitude)),
            longitude: Some(Value::from(longitude)),
        }
    }

    /// Check presence, types and ranges. A coordinate of exactly 0 is present.
    pub fn validate(&self) -> Result<NewSchool, RegistryError> {
        let (Some(name), Some(address), Some(latitude), Some(longitude)) =
            (&self.name, &self.address, &self.latitude, &self.longitude)
        else {
            return Err(RegistryError::validation(MSG_FIELDS_REQUIRED));
        };

        if is_empty_text(name) || is_empty_text(address) {
            return Err(RegistryError::validation(MSG_FIELDS_REQUIRED));
        }
        let (Some(name), Some(address)) = (name.as_str(), address.as_str()) else {
            return Err(RegistryError::validation(MSG_TEXT_FIELDS));
        };

        let (Some(latitude), Some(longitude)) = (latitude.as_f64(), longitude.as_f64()) else {
            return Err(RegistryError::validation(MSG_COORDS_NOT_NUMBERS));
        };
        let location = GeoPoint::new(latitude, longitude);
        if !location.is_valid() {
            return Err(RegistryError::validation(MSG_COORDS_OUT_OF_RANGE));
        }

        Ok(NewSchool {
            name: name.to_string(),
            address: address.to_string(),
            location,
        })
    }
}

fn is_empty_text(value: &Value) -> bool {
    value.as_str().is_some_and(str::is_empty)
}

/// Query-string form of a ranking request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DistanceQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl DistanceQuery {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
        }
    }

    pub fn parse(&self) -> Result<GeoPoint, RegistryError> {
        let (Some(latitude), Some(longitude)) = (
            self.latitude.as_deref().map(str::trim).filter(|s| !s.is_empty()),
            self.longitude.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        ) else {
            return Err(RegistryError::validation(MSG_QUERY_REQUIRED));
        };

        match (parse_finite(latitude), parse_finite(longitude)) {
            (Some(latitude), Some(longitude)) => Ok(GeoPoint::new(latitude, longitude)),
            _ => Err(RegistryError::validation(MSG_QUERY_INVALID)),
        }
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A stored school with its distance from the query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSchool {
    #[serde(flatten)]
    pub school: School,
    /// Meters from the query point
    pub distance: f64,
}

/// Registry over an injected storage backend.
pub struct SchoolRegistry {
    store: Arc<dyn SchoolStore>,
    /// Serializes read-check-insert so two concurrent admissions cannot both
    /// pass against the same snapshot. Only covers this process; several
    /// processes sharing one database can still race.
    admission: Mutex<()>,
}

impl SchoolRegistry {
    pub fn new(store: Arc<dyn SchoolStore>) -> Self {
        Self {
            store,
            admission: Mutex::new(()),
        }
    }

    /// Validate the candidate, reject it if any stored school is closer than
    /// [`MIN_SEPARATION_METERS`], otherwise store it.
    pub async fn admit_school(&self, candidate: &SchoolCandidate) -> Result<School, RegistryError> {
        let school = candidate.validate()?;

        let _guard = self.admission.lock().await;
        let existing = self.store.list_coordinates().await?;
        debug!("Checking separation against {} schools", existing.len());

        if let Some(distance) = existing
            .iter()
            .map(|point| school.location.distance_to(point))
            .find(|distance| *distance < MIN_SEPARATION_METERS)
        {
            info!("Rejected '{}': existing school {:.1} m away", school.name, distance);
            return Err(RegistryError::TooClose { distance_meters: distance });
        }

        let id = self.store.insert(&school).await?;
        info!("Admitted school '{}' with id {}", school.name, id);
        Ok(school.into_school(id))
    }

    /// Parse the query point and rank every stored school by distance to it.
    pub async fn list_schools_by_distance(
        &self,
        query: &DistanceQuery,
    ) -> Result<Vec<RankedSchool>, RegistryError> {
        let origin = query.parse()?;
        self.rank_from(origin).await
    }

    /// All stored schools, nearest first. Ties keep storage order.
    pub async fn rank_from(&self, origin: GeoPoint) -> Result<Vec<RankedSchool>, RegistryError> {
        let mut ranked: Vec<RankedSchool> = self
            .store
            .list_all()
            .await?
            .into_iter()
            .map(|school| RankedSchool {
                distance: origin.distance_to(&school.location()),
                school,
            })
            .collect();

        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Ok(ranked)
    }
}
