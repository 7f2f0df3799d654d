//! Strategy assembly: one driver's stints, pace, degradation, pit effects
//! and suggested windows, stitched from the lower-level analyses.

use std::collections::BTreeMap;

use crate::models::{AnalysisParams, DriverStrategy, LapRecord};

use super::{degradation, pit_effect, segment};

/// Builds the per-driver strategy picture for a session.
///
/// Drivers come back in alphabetical order; within a driver, stints keep
/// their segmentation order and every stint carries its fit, pace and any
/// suggested pit window.
pub fn driver_strategies(laps: &[LapRecord], params: &AnalysisParams) -> Vec<DriverStrategy> {
    let mut stints = segment::segment_stints(laps);
    for stint in &mut stints {
        degradation::fit_stint(stint, laps, &params.pace);
        stint.suggested_pit_window = pit_effect::suggest_pit_window(stint, &params.pit);
    }

    let mut by_driver: BTreeMap<String, DriverStrategy> = BTreeMap::new();
    for stint in stints {
        by_driver
            .entry(stint.driver.clone())
            .or_insert_with(|| DriverStrategy {
                driver: stint.driver.clone(),
                pit_laps: Vec::new(),
                stints: Vec::new(),
                pit_effects: Vec::new(),
            })
            .stints
            .push(stint);
    }

    for (driver, strategy) in by_driver.iter_mut() {
        strategy.pit_laps = pit_effect::pit_laps(laps, driver);
        strategy.pit_effects =
            pit_effect::pit_effects(laps, driver, &strategy.pit_laps, &params.pit);
    }

    by_driver.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Compound, PitEffectLabel};

    fn lap(driver: &str, n: u32, time: f64, compound: Compound, stint: u32) -> LapRecord {
        LapRecord {
            driver: driver.into(),
            lap_number: n,
            lap_time_s: time,
            compound,
            stint_id: Some(stint),
            pit_in: false,
            pit_out: false,
            elapsed_s: None,
            is_accurate: true,
            team: None,
        }
    }

    /// Two stints with a stop on lap 10: degrading softs, then fresh mediums.
    fn two_stop_driver(driver: &str) -> Vec<LapRecord> {
        let mut laps = Vec::new();
        for n in 1..=9 {
            laps.push(lap(driver, n, 90.0 + 0.1 * n as f64, Compound::Soft, 1));
        }
        let mut in_lap = lap(driver, 10, 109.0, Compound::Soft, 1);
        in_lap.pit_in = true;
        laps.push(in_lap);
        let mut out_lap = lap(driver, 11, 102.0, Compound::Medium, 2);
        out_lap.pit_out = true;
        laps.push(out_lap);
        for n in 12..=20 {
            laps.push(lap(driver, n, 89.6, Compound::Medium, 2));
        }
        laps
    }

    #[test]
    fn assembly_carries_stints_pits_and_effects() {
        let laps = two_stop_driver("PIA");
        let params = AnalysisParams::default();
        let strategies = driver_strategies(&laps, &params);
        assert_eq!(strategies.len(), 1);
        let s = &strategies[0];
        assert_eq!(s.driver, "PIA");
        assert_eq!(s.pit_laps, vec![10]);
        assert_eq!(s.stints.len(), 2);
        assert_eq!(s.pit_effects.len(), 1);
        // Softs degrade at 0.1 s/lap: above the 0.06 alert, so the first
        // stint carries a window; the flat mediums do not.
        assert!(s.stints[0].suggested_pit_window.is_some());
        assert!(s.stints[1].suggested_pit_window.is_none());
        assert_eq!(s.pit_effects[0].label, PitEffectLabel::UndercutLike);
    }

    #[test]
    fn drivers_come_back_alphabetical() {
        let mut laps = two_stop_driver("VER");
        laps.extend(two_stop_driver("ALO"));
        let strategies = driver_strategies(&laps, &AnalysisParams::default());
        let names: Vec<&str> = strategies.iter().map(|s| s.driver.as_str()).collect();
        assert_eq!(names, vec!["ALO", "VER"]);
    }

    #[test]
    fn driver_without_stops_has_empty_pit_fields() {
        let laps: Vec<LapRecord> = (1..=8)
            .map(|n| lap("HUL", n, 91.0, Compound::Hard, 1))
            .collect();
        let strategies = driver_strategies(&laps, &AnalysisParams::default());
        let s = &strategies[0];
        assert!(s.pit_laps.is_empty());
        assert!(s.pit_effects.is_empty());
        assert_eq!(s.stints.len(), 1);
    }
}
