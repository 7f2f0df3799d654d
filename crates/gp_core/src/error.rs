//! Crate-wide error taxonomy.
//!
//! Two layers:
//! - [`TelemetryError`](crate::telemetry::TelemetryError) at the provider
//!   boundary, where "not published yet" must stay distinguishable from a
//!   real failure (the outcome cascade recovers from the former only).
//! - [`CoreError`] for everything that reaches a caller. Insufficient
//!   samples and malformed input rows are NOT errors at this level: they
//!   surface as `None` metrics with a message, or as per-row drop entries
//!   on the normalizer output.

use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Error, Debug)]
pub enum CoreError {
    /// A non-recoverable telemetry problem (timeout, upstream failure).
    /// "Data not available" never reaches callers through this variant;
    /// the cascade converts it into a structured no-data result instead.
    #[error("telemetry failure: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
