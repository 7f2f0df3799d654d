//! Telemetry provider boundary.
//!
//! Everything upstream of this crate — timing feeds, archives, on-disk
//! caches of raw telemetry — hides behind [`TelemetryProvider`]. The trait
//! is synchronous and object-safe; implementations own their transport,
//! apply their own request timeouts, and report timeouts as
//! [`TelemetryError::Timeout`], never as missing data.
//!
//! Two implementations ship with the crate: [`MemoryProvider`] (tests,
//! embedding) and [`DumpProvider`] (local JSON session dumps, used by the
//! CLI).

pub mod dump;
pub mod error;
pub mod memory;

pub use dump::DumpProvider;
pub use error::TelemetryError;
pub use memory::MemoryProvider;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::RawLap;

// ============================================================================
// Session addressing
// ============================================================================

/// Session within a race weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionCode {
    #[serde(rename = "FP1")]
    Fp1,
    #[serde(rename = "FP2")]
    Fp2,
    #[serde(rename = "FP3")]
    Fp3,
    Q,
    R,
}

impl SessionCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionCode::Fp1 => "FP1",
            SessionCode::Fp2 => "FP2",
            SessionCode::Fp3 => "FP3",
            SessionCode::Q => "Q",
            SessionCode::R => "R",
        }
    }

    /// All codes, in weekend order.
    pub fn all() -> [SessionCode; 5] {
        [
            SessionCode::Fp1,
            SessionCode::Fp2,
            SessionCode::Fp3,
            SessionCode::Q,
            SessionCode::R,
        ]
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FP1" => Ok(SessionCode::Fp1),
            "FP2" => Ok(SessionCode::Fp2),
            "FP3" => Ok(SessionCode::Fp3),
            "Q" => Ok(SessionCode::Q),
            "R" => Ok(SessionCode::R),
            other => Err(format!("unknown session code: {}", other)),
        }
    }
}

// ============================================================================
// Session payload
// ============================================================================

/// One classified-result row as published by the upstream source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionResult {
    pub driver: String,
    /// Final classified position; floats upstream, absent when unclassified.
    pub position: Option<f64>,
    pub team: Option<String>,
    /// Championship points awarded in this session.
    pub points: Option<f64>,
    /// Starting grid position (race sessions).
    pub grid: Option<f64>,
}

/// One weather observation, session-relative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSample {
    pub elapsed_s: f64,
    pub air_temp_c: Option<f64>,
    pub track_temp_c: Option<f64>,
    pub rainfall: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub wind_direction_deg: Option<f64>,
}

/// Everything a provider returns for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionData {
    pub laps: Vec<RawLap>,
    pub results: Vec<SessionResult>,
    pub weather: Vec<WeatherSample>,
}

/// One calendar entry of a season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub round: u32,
    pub name: String,
    #[serde(default)]
    pub is_testing: bool,
}

/// Championship rounds only: round numbers start at 1 and testing events
/// never count.
pub fn race_events(schedule: &[ScheduledEvent]) -> Vec<ScheduledEvent> {
    schedule
        .iter()
        .filter(|e| e.round >= 1 && !e.is_testing)
        .cloned()
        .collect()
}

// ============================================================================
// Provider trait
// ============================================================================

/// Source of raw session telemetry and season schedules.
pub trait TelemetryProvider: Send + Sync {
    /// Raw laps, classified results and weather for one session.
    fn session(
        &self,
        season: u16,
        round: u32,
        code: SessionCode,
    ) -> Result<SessionData, TelemetryError>;

    /// The season calendar, testing events included.
    fn schedule(&self, season: u16) -> Result<Vec<ScheduledEvent>, TelemetryError>;
}
