//! Tyre degradation fitting.
//!
//! One least-squares line per stint over quick laps only: lap number in,
//! lap time out. The slope is the quantity strategists read — seconds of
//! lap time added per lap as the tyre ages.

use crate::config::PaceConfig;
use crate::models::{LapRecord, Stint};
use crate::stats;

use super::pace;

/// How to read a degradation table. Attached to every report.
pub const DEGRADATION_NOTE: &str =
    "Fit over quick laps only; a positive slope means lap times are increasing as the stint ages.";

/// Computes pace and the degradation fit for one segmented stint, in place.
///
/// Pace follows the robust estimator; the fit additionally requires
/// `min_fit_laps` quick laps and otherwise leaves slope/intercept/r² unset
/// with an explanatory message. `best_lap_s` and `laps_used` are recorded
/// in both cases.
pub fn fit_stint(stint: &mut Stint, laps: &[LapRecord], config: &PaceConfig) {
    let clean = pace::clean_stint_laps(laps, stint);
    let times: Vec<f64> = clean.iter().map(|l| l.lap_time_s).collect();
    stint.pace_s = pace::pace_from_times(&times, config);

    let quick = pace::quick_laps(&clean, config);
    stint.laps_used = quick.len() as u32;
    stint.best_lap_s = quick
        .iter()
        .map(|l| l.lap_time_s)
        .fold(None, |best: Option<f64>, t| match best {
            Some(b) if b <= t => Some(b),
            _ => Some(t),
        });

    if quick.len() < config.min_fit_laps {
        stint.fit_message = Some(format!(
            "Not enough quick laps for fit (need {}, got {})",
            config.min_fit_laps,
            quick.len()
        ));
        return;
    }

    let xs: Vec<f64> = quick.iter().map(|l| l.lap_number as f64).collect();
    let ys: Vec<f64> = quick.iter().map(|l| l.lap_time_s).collect();
    if let Some(fit) = stats::linear_fit(&xs, &ys) {
        stint.slope_s_per_lap = Some(fit.slope);
        stint.intercept_s = Some(fit.intercept);
        stint.r_squared = Some(fit.r_squared);
        stint.fit_message = Some("OK".into());
    }
}

/// Degradation table for a whole session: segment, fit, then order by
/// (lap_start, compound, driver) for stable presentation.
pub fn session_stints(laps: &[LapRecord], config: &PaceConfig) -> Vec<Stint> {
    let mut stints = super::segment::segment_stints(laps);
    for stint in &mut stints {
        fit_stint(stint, laps, config);
    }
    stints.sort_by(|a, b| {
        a.lap_start
            .cmp(&b.lap_start)
            .then(a.compound.as_str().cmp(b.compound.as_str()))
            .then(a.driver.cmp(&b.driver))
    });
    stints
}
