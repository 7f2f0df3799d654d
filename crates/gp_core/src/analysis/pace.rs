//! Robust pace estimation.
//!
//! Lap-time samples inside a stint are polluted by safety cars, traffic and
//! the stops themselves. The quick-lap filter removes that noise in two
//! deterministic steps, and the pace estimate is the median of what
//! survives:
//!
//! 1. drop laps slower than `median + outlier_threshold_s`;
//! 2. keep laps at or below the `quick_quantile` cutoff of the remainder;
//! 3. with at least `min_quick_laps` survivors, pace = median of survivors.

use crate::config::PaceConfig;
use crate::models::{LapRecord, Stint};
use crate::stats;

/// Outlier cap and quantile cutoff for a set of lap times.
fn quick_thresholds(times: &[f64], config: &PaceConfig) -> Option<(f64, f64)> {
    let med = stats::median(times)?;
    let cap = med + config.outlier_threshold_s;
    let kept: Vec<f64> = times.iter().copied().filter(|t| *t <= cap).collect();
    let cutoff = stats::quantile(&kept, config.quick_quantile)?;
    Some((cap, cutoff))
}

/// The quick-lap filter over bare times.
pub fn quick_times(times: &[f64], config: &PaceConfig) -> Vec<f64> {
    match quick_thresholds(times, config) {
        Some((cap, cutoff)) => times
            .iter()
            .copied()
            .filter(|t| *t <= cap && *t <= cutoff)
            .collect(),
        None => Vec::new(),
    }
}

/// The quick-lap filter over lap records, preserving lap identity for the
/// degradation fit.
pub fn quick_laps<'a>(laps: &[&'a LapRecord], config: &PaceConfig) -> Vec<&'a LapRecord> {
    let times: Vec<f64> = laps.iter().map(|l| l.lap_time_s).collect();
    match quick_thresholds(&times, config) {
        Some((cap, cutoff)) => laps
            .iter()
            .copied()
            .filter(|l| l.lap_time_s <= cap && l.lap_time_s <= cutoff)
            .collect(),
        None => Vec::new(),
    }
}

/// Representative pace: median of quick laps, `None` below the sample floor.
pub fn pace_from_times(times: &[f64], config: &PaceConfig) -> Option<f64> {
    let quick = quick_times(times, config);
    if quick.len() < config.min_quick_laps {
        return None;
    }
    stats::median(&quick)
}

/// A stint's laps that may feed pace statistics: inside the lap range, same
/// driver, and never a lap that touched the pit lane.
pub fn clean_stint_laps<'a>(laps: &'a [LapRecord], stint: &Stint) -> Vec<&'a LapRecord> {
    laps.iter()
        .filter(|l| {
            l.driver == stint.driver && stint.contains_lap(l.lap_number) && !l.is_pit()
        })
        .collect()
}
