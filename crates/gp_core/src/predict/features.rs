//! Pre-race feature extraction for the pluggable classifier tier.

use std::collections::HashMap;

use crate::analysis::normalize;
use crate::models::FeatureRow;
use crate::telemetry::SessionData;

/// Builds one feature row per entrant from a qualifying session: the
/// classified position stands in for grid slot, the best lap for raw
/// single-lap pace. Entrants with no classified row still get one when
/// they set a timed lap.
pub fn rows_from_qualifying(season: u16, round: u32, quali: &SessionData) -> Vec<FeatureRow> {
    let normalized = normalize::normalize_laps(&quali.laps);
    let mut best: HashMap<&str, f64> = HashMap::new();
    for lap in &normalized.laps {
        best.entry(lap.driver.as_str())
            .and_modify(|b| {
                if lap.lap_time_s < *b {
                    *b = lap.lap_time_s;
                }
            })
            .or_insert(lap.lap_time_s);
    }

    let mut rows: Vec<FeatureRow> = quali
        .results
        .iter()
        .map(|r| FeatureRow {
            season,
            round,
            driver: r.driver.clone(),
            team: r.team.clone(),
            grid_position: r.position.filter(|p| p.is_finite()),
            quali_best_s: best.get(r.driver.as_str()).copied(),
        })
        .collect();

    // Lap setters missing from the classification, in lap order.
    let classified: Vec<&str> = rows.iter().map(|r| r.driver.as_str()).collect();
    let mut extra: Vec<&str> = best
        .keys()
        .copied()
        .filter(|d| !classified.contains(d))
        .collect();
    extra.sort_unstable();
    for driver in extra {
        rows.push(FeatureRow {
            season,
            round,
            driver: driver.to_string(),
            team: None,
            grid_position: None,
            quali_best_s: best.get(driver).copied(),
        });
    }
    rows
}
