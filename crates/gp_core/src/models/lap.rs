//! Lap-level data model.
//!
//! [`RawLap`] is the schema-optional record as it arrives from a telemetry
//! dump: every column may be absent because upstream sources differ in what
//! they publish per session. [`LapRecord`] is the canonical form produced by
//! the normalizer; once a record exists, its driver, lap number and lap time
//! are guaranteed present and valid.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tyre compound, normalized from free-form upstream strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    Unknown,
}

impl Compound {
    /// Maps an upstream compound label onto the enum by substring.
    ///
    /// `INTER` is tested before `MED` because "INTERMEDIATE" contains both.
    pub fn from_upstream(raw: &str) -> Self {
        let s = raw.trim().to_uppercase();
        if s.contains("SOFT") {
            Compound::Soft
        } else if s.contains("INTER") {
            Compound::Intermediate
        } else if s.contains("MED") {
            Compound::Medium
        } else if s.contains("HARD") {
            Compound::Hard
        } else if s.contains("WET") {
            Compound::Wet
        } else {
            Compound::Unknown
        }
    }

    /// True for the dry-weather compounds.
    pub fn is_slick(&self) -> bool {
        matches!(self, Compound::Soft | Compound::Medium | Compound::Hard)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Compound::Soft => "SOFT",
            Compound::Medium => "MEDIUM",
            Compound::Hard => "HARD",
            Compound::Intermediate => "INTERMEDIATE",
            Compound::Wet => "WET",
            Compound::Unknown => "UNKNOWN",
        }
    }
}

impl Default for Compound {
    fn default() -> Self {
        Compound::Unknown
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One lap as delivered by a telemetry dump, before validation.
///
/// All fields are optional; the normalizer decides which absences are fatal
/// for the row (driver, lap number, lap time) and which get defaults
/// (compound → `UNKNOWN`, accuracy flag → `true`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLap {
    pub driver: Option<String>,
    /// Upstream lap counters arrive as floats; validated to an integer ≥ 1.
    pub lap_number: Option<f64>,
    pub lap_time_s: Option<f64>,
    pub compound: Option<String>,
    pub stint: Option<f64>,
    /// Session-relative time of the pit entry on this lap, if any.
    pub pit_in_elapsed_s: Option<f64>,
    /// Session-relative time of the pit exit on this lap, if any.
    pub pit_out_elapsed_s: Option<f64>,
    /// Session-relative start time of the lap.
    pub elapsed_s: Option<f64>,
    /// Upstream timing-accuracy flag; absent means trusted.
    pub is_accurate: Option<bool>,
    pub team: Option<String>,
}

/// A validated lap. Produced only by the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapRecord {
    pub driver: String,
    pub lap_number: u32,
    pub lap_time_s: f64,
    pub compound: Compound,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stint_id: Option<u32>,
    /// Lap on which the car entered the pit lane.
    pub pit_in: bool,
    /// Lap on which the car left the pit lane (out-lap).
    pub pit_out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_s: Option<f64>,
    pub is_accurate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

impl LapRecord {
    /// True when the lap touched the pit lane in either direction.
    /// Pit laps anchor stint boundaries but never feed pace statistics.
    pub fn is_pit(&self) -> bool {
        self.pit_in || self.pit_out
    }
}

/// Why a raw row was dropped during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowError {
    /// Zero-based index of the offending row in the input slice.
    pub row: usize,
    pub reason: String,
}

/// Normalizer output: canonical laps plus per-row drop records.
///
/// Malformed rows never abort a batch; they are skipped and accounted for
/// here so a caller can surface data quality without failing the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedLaps {
    pub laps: Vec<LapRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub dropped: Vec<RowError>,
}
