//! Stint data model.
//!
//! A stint is a maximal run of consecutive laps by one driver on one set of
//! tyres. The segmenter produces stints with only identity and lap-range
//! fields populated; the pace estimator and degradation regressor fill the
//! analytic fields in place.

use serde::{Deserialize, Serialize};

use super::lap::Compound;

/// Suggested pit-stop window, expressed in lap numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitWindow {
    pub from_lap: u32,
    pub to_lap: u32,
    /// Why the window was raised, including the fitted slope.
    pub reason: String,
}

/// One tyre stint with optional derived analytics.
///
/// Invariants maintained by the segmenter, per driver:
/// stints are ordered, their lap ranges never overlap, and together the
/// ranges cover every normalized lap the driver completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stint {
    pub driver: String,
    /// 1-based ordinal within the driver's race.
    pub stint_id: u32,
    pub compound: Compound,
    pub lap_start: u32,
    pub lap_end: u32,
    /// Laps carried by the stint, pit laps included.
    pub laps_total: u32,
    /// Quick laps that actually fed the degradation fit.
    pub laps_used: u32,
    /// Robust representative pace (median of quick laps), seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_lap_s: Option<f64>,
    /// Fitted degradation: seconds of lap time added per lap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope_s_per_lap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intercept_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r_squared: Option<f64>,
    /// Fit status: "OK", or why slope/intercept/r² were withheld.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_pit_window: Option<PitWindow>,
}

impl Stint {
    /// A freshly segmented stint with no analytics attached yet.
    pub fn new(
        driver: impl Into<String>,
        stint_id: u32,
        compound: Compound,
        lap_start: u32,
        lap_end: u32,
        laps_total: u32,
    ) -> Self {
        Self {
            driver: driver.into(),
            stint_id,
            compound,
            lap_start,
            lap_end,
            laps_total,
            laps_used: 0,
            pace_s: None,
            best_lap_s: None,
            slope_s_per_lap: None,
            intercept_s: None,
            r_squared: None,
            fit_message: None,
            suggested_pit_window: None,
        }
    }

    /// Lap-range length, in laps. A single-lap stint spans 0.
    pub fn lap_span(&self) -> u32 {
        self.lap_end.saturating_sub(self.lap_start)
    }

    pub fn contains_lap(&self, lap: u32) -> bool {
        lap >= self.lap_start && lap <= self.lap_end
    }
}
