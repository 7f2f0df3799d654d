use thiserror::Error;

/// Result of asking the telemetry boundary for data.
///
/// `NotAvailable` is the only recoverable variant: it marks sessions the
/// upstream source has not published (future rounds, seasons outside the
/// archive). The outcome cascade falls through on it; everything else —
/// timeouts included — aborts the request. No caller may classify these by
/// matching on the message text.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("session data not available: {reason}")]
    NotAvailable { reason: String },

    #[error("telemetry request timed out after {waited_ms} ms")]
    Timeout { waited_ms: u64 },

    #[error("telemetry provider failure: {message}")]
    Failure { message: String },
}

impl TelemetryError {
    pub fn not_available(reason: impl Into<String>) -> Self {
        TelemetryError::NotAvailable { reason: reason.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        TelemetryError::Failure { message: message.into() }
    }

    /// True only for "data not published yet".
    pub fn is_not_available(&self) -> bool {
        matches!(self, TelemetryError::NotAvailable { .. })
    }
}
