//! Session-level report assemblies.
//!
//! These are the objects callers receive (and the read-through cache
//! stores): per-driver strategy pictures, flattened degradation tables, raw
//! stint layouts and the session-evolution report. Each echoes the
//! parameters that produced it and carries a generation timestamp, so a
//! cached copy is self-describing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{EvolutionConfig, PaceConfig, PitConfig};
use crate::telemetry::{SessionCode, WeatherSample};

use super::pit::PitEvent;
use super::stint::Stint;

/// Threshold set echoed by strategy and degradation reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisParams {
    pub pace: PaceConfig,
    pub pit: PitConfig,
}

/// One driver's strategy picture for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverStrategy {
    pub driver: String,
    /// Laps on which the car entered the pit lane, ascending.
    pub pit_laps: Vec<u32>,
    pub stints: Vec<Stint>,
    pub pit_effects: Vec<PitEvent>,
}

/// Pace, degradation and pit-effect analysis for every driver in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyReport {
    pub season: u16,
    pub round: u32,
    pub session: SessionCode,
    pub drivers: Vec<DriverStrategy>,
    pub params: AnalysisParams,
    /// Raw rows the normalizer refused.
    pub rows_dropped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// Flattened per-stint degradation table for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationReport {
    pub season: u16,
    pub round: u32,
    pub session: SessionCode,
    /// Ordered by (lap_start, compound) across all drivers.
    pub stints: Vec<Stint>,
    pub params: PaceConfig,
    /// How to read the table (sign convention of the slope).
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// One driver's raw stint layout, no analytics attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverTyres {
    pub driver: String,
    pub stints: Vec<Stint>,
    pub pit_laps: Vec<u32>,
}

/// Stint layout of a whole session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TyreReport {
    pub season: u16,
    pub round: u32,
    pub session: SessionCode,
    /// Highest lap number completed by anyone in the session.
    pub total_laps: u32,
    pub drivers: Vec<DriverTyres>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// One time bucket of the session-evolution index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionPoint {
    /// Bucket start, seconds of session time.
    pub t_s: f64,
    pub median_lap_s: f64,
    /// Clean laps in the bucket.
    pub laps: u32,
    /// Session-best over bucket median; climbs toward 1.0 as grip builds.
    pub evolution_index: f64,
}

/// Weather trace plus track-evolution index for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionReport {
    pub season: u16,
    pub round: u32,
    pub session: SessionCode,
    pub weather: Vec<WeatherSample>,
    pub evolution: Vec<EvolutionPoint>,
    pub params: EvolutionConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub generated_at: DateTime<Utc>,
}
