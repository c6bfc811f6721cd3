//! Registry error taxonomy

use thiserror::Error;

pub const MSG_FIELDS_REQUIRED: &str = "All fields are required";
pub const MSG_TEXT_FIELDS: &str = "Name and address must be text";
pub const MSG_COORDS_NOT_NUMBERS: &str = "Latitude and longitude must be numbers";
pub const MSG_COORDS_OUT_OF_RANGE: &str =
    "Latitude must be between -90 and 90 and longitude between -180 and 180";
pub const MSG_QUERY_REQUIRED: &str = "Latitude and longitude are required";
pub const MSG_QUERY_INVALID: &str = "Latitude and longitude must be valid numbers";

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Missing or malformed input. Storage was not touched.
    #[error("{0}")]
    Validation(String),

    /// An existing school lies inside the minimum separation distance.
    #[error("A school already exists too close to this location")]
    TooClose { distance_meters: f64 },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl RegistryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
