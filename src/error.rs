//! Simulation errors.

use thiserror::Error;

/// Errors produced by the simulation core.
///
/// Inventory overflow is intentionally absent: a full row drops the add
/// silently (see [`crate::game::inventory::AddOutcome::Dropped`]).
#[derive(Debug, Error)]
pub enum SimError {
    /// An action or request was built with an out-of-domain payload.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced item id or grid coordinate does not exist.
    #[error("missing reference: {0}")]
    MissingReference(String),

    /// Static data (item catalog, config) failed to parse.
    #[error("malformed data: {0}")]
    MalformedData(#[from] serde_json::Error),
}

/// Convenience alias used across the crate.
pub type SimResult<T> = Result<T, SimError>;
