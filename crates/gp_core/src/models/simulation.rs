//! Championship simulation data model.

use serde::{Deserialize, Serialize};

/// How the championship is projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    /// Monte Carlo over sampled finishing orders with points accumulation.
    Full,
    /// Deterministic expected-points pass, no sampling.
    Fast,
}

/// One driver's or team's projected championship standing.
///
/// Exactly one of the two metrics is populated, depending on the mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChampionshipStanding {
    pub name: String,
    /// Share of trials won (full mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_probability: Option<f64>,
    /// Accumulated expected points (fast mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_points: Option<f64>,
}

/// Championship projection over the simulated rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub season: u16,
    pub mode: SimulationMode,
    /// Trials actually run; 0 in fast mode (single deterministic pass).
    pub trials: u32,
    /// Rounds that contributed a prediction table, in order.
    pub rounds: Vec<u32>,
    /// Descending by the populated metric.
    pub drivers: Vec<ChampionshipStanding>,
    pub teams: Vec<ChampionshipStanding>,
    /// Set when the projection is empty (no schedule, no rankable rounds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
