//! Session evolution index.
//!
//! As rubber goes down, a session's clean pace creeps toward its best. The
//! index tracks that: clean laps (accurate, non-pit, with a session
//! timestamp) pass a global quantile cut, get bucketed by session time, and
//! each bucket reports `session_best / bucket_median` — a number that
//! climbs toward 1.0 as grip builds.

use std::collections::BTreeMap;

use crate::config::EvolutionConfig;
use crate::models::{EvolutionPoint, LapRecord};
use crate::stats;

/// Computes the per-bucket evolution index for a session's laps.
///
/// Returns an empty vector when no lap qualifies (no timestamps, nothing
/// accurate); the caller decides what message that deserves.
pub fn evolution_points(laps: &[LapRecord], config: &EvolutionConfig) -> Vec<EvolutionPoint> {
    let clean: Vec<&LapRecord> = laps
        .iter()
        .filter(|l| l.is_accurate && !l.is_pit() && l.elapsed_s.is_some())
        .collect();
    let times: Vec<f64> = clean.iter().map(|l| l.lap_time_s).collect();
    let cutoff = match stats::quantile(&times, config.quick_quantile) {
        Some(c) => c,
        None => return Vec::new(),
    };
    let quick: Vec<&LapRecord> = clean
        .into_iter()
        .filter(|l| l.lap_time_s <= cutoff)
        .collect();

    let best = quick
        .iter()
        .map(|l| l.lap_time_s)
        .fold(f64::INFINITY, f64::min);
    if !best.is_finite() {
        return Vec::new();
    }

    let bucket_s = if config.bucket_s > 0.0 { config.bucket_s } else { 60.0 };
    let mut buckets: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for l in &quick {
        if let Some(t) = l.elapsed_s {
            let idx = (t / bucket_s).floor() as i64;
            buckets.entry(idx).or_default().push(l.lap_time_s);
        }
    }

    buckets
        .into_iter()
        .filter_map(|(idx, bucket_times)| {
            stats::median(&bucket_times).map(|median_lap_s| EvolutionPoint {
                t_s: idx as f64 * bucket_s,
                median_lap_s,
                laps: bucket_times.len() as u32,
                evolution_index: best / median_lap_s,
            })
        })
        .collect()
}
