//! Error types shared across the matching core.
//!
//! Ineligibility and zero scores are ordinary values, not errors. Only bad
//! input, collaborator failures and configuration problems surface here.

use thiserror::Error;

/// Caller-supplied data that cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("route must contain at least one point to insert stops into")]
    EmptyRoute,
    #[error("invalid trip {id}: {reason}")]
    InvalidTrip { id: String, reason: String },
    #[error("invalid school email '{email}': expected an address under {domain}")]
    InvalidEmail { email: String, domain: String },
}

/// Failure of a single routing-provider call.
///
/// The detour evaluator never propagates these; a failed leg counts as zero.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    #[error("routing request failed: {0}")]
    Http(String),
    #[error("routing provider returned {0}")]
    Api(String),
    #[error("no route between the requested points")]
    NoRoute,
    #[error("routing provider timed out")]
    Timeout,
    #[error("routing provider returned an unusable response: {0}")]
    InvalidResponse(String),
    #[error("route table could not be loaded: {0}")]
    Table(String),
}

/// Failure of a trip or user store collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The query itself was malformed; the store is fine.
    #[error(transparent)]
    Input(#[from] InputError),
}

/// Failure of the end-to-end match pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Store(StoreError),
    #[error("unknown user {0}")]
    UnknownUser(String),
    #[error("unknown trip {0}")]
    UnknownTrip(String),
}

impl From<StoreError> for MatchError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Input(input) => MatchError::Input(input),
            other => MatchError::Store(other),
        }
    }
}

/// Failure to load or validate engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
