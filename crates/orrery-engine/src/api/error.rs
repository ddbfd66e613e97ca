use thiserror::Error;

use crate::api::types::BodyId;

/// Failure taxonomy of the simulation core.
///
/// None of these are fatal to the frame loop: callers either degrade
/// (missing ephemeris data), ignore the request (bad date text, invalid
/// focus target) or surface it to the presentational layer (resources).
#[derive(Debug, Error)]
pub enum SimError {
    #[error("no ephemeris data for {body}: {reason}")]
    MissingEphemerisData { body: String, reason: String },

    #[error("{0:?} is not a body that can be focused")]
    InvalidSelectionTarget(BodyId),

    #[error("unknown body `{0}`")]
    UnknownBody(String),

    #[error("could not parse date input `{input}`")]
    MalformedDateInput { input: String },

    #[error("simulated date left the representable range")]
    DateOutOfRange,

    #[error("resource `{resource}` unavailable: {reason}")]
    ResourceUnavailable { resource: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid body catalog: {0}")]
    InvalidCatalog(String),
}

impl SimError {
    pub fn missing(body: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::MissingEphemerisData {
            body: body.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error is the degradable "provider cannot resolve" case.
    pub fn is_missing_ephemeris(&self) -> bool {
        matches!(self, SimError::MissingEphemerisData { .. })
    }
}
