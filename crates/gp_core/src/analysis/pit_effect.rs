//! Pit-stop effect measurement and pit-window suggestion.
//!
//! The delta convention is fixed: `delta = pre - post`, so a positive delta
//! means the car got faster after the stop. Gains above the undercut
//! threshold read as "undercut_like"; a stop whose comparison windows hold
//! no clean laps is labeled "insufficient_data" rather than pretending to
//! be neutral.

use crate::config::PitConfig;
use crate::models::{LapRecord, PitEffectLabel, PitEvent, PitWindow, Stint};
use crate::stats;

/// Pit-entry laps for one driver, deduplicated and ascending.
pub fn pit_laps(laps: &[LapRecord], driver: &str) -> Vec<u32> {
    let mut out: Vec<u32> = laps
        .iter()
        .filter(|l| l.driver == driver && l.pit_in)
        .map(|l| l.lap_number)
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Median pace of a driver's clean laps inside `[from, to]` (inclusive).
fn window_pace(laps: &[LapRecord], driver: &str, from: u32, to: u32) -> Option<f64> {
    let times: Vec<f64> = laps
        .iter()
        .filter(|l| {
            l.driver == driver && !l.is_pit() && l.lap_number >= from && l.lap_number <= to
        })
        .map(|l| l.lap_time_s)
        .collect();
    stats::median(&times)
}

/// Measures the pace effect of each of a driver's stops.
///
/// For a stop on lap `L`, pre spans `[L - window, L - 1]` and post spans
/// `[L + 1, L + window]` (window = `config.window_laps`); pit-flagged laps
/// are excluded from both sides.
pub fn pit_effects(
    laps: &[LapRecord],
    driver: &str,
    pits: &[u32],
    config: &PitConfig,
) -> Vec<PitEvent> {
    let w = config.window_laps;
    pits.iter()
        .map(|&pit_lap| {
            // Window bounds without underflow: pre is [pit-w, pit-1].
            let pre_from = pit_lap.saturating_sub(w);
            let pre = if pit_lap == 0 {
                None
            } else {
                window_pace(laps, driver, pre_from.max(1), pit_lap - 1)
            };
            let post = window_pace(laps, driver, pit_lap + 1, pit_lap + w);
            let (delta, label) = match (pre, post) {
                (Some(a), Some(b)) => {
                    let d = a - b;
                    let label = if d > config.undercut_threshold_s {
                        PitEffectLabel::UndercutLike
                    } else {
                        PitEffectLabel::Neutral
                    };
                    (Some(d), label)
                }
                _ => (None, PitEffectLabel::InsufficientData),
            };
            PitEvent {
                driver: driver.to_string(),
                lap: pit_lap,
                pre_pace_s: pre,
                post_pace_s: post,
                delta_s: delta,
                label,
            }
        })
        .collect()
}

/// Raises a pit window when the fitted slope crosses the alert threshold.
///
/// The window sits in the configured fractional band of the stint span
/// (55%-85% by default), floored to lap numbers and clamped to start no
/// earlier than the stint itself.
pub fn suggest_pit_window(stint: &Stint, config: &PitConfig) -> Option<PitWindow> {
    let slope = stint.slope_s_per_lap?;
    if slope < config.alert_slope {
        return None;
    }
    let span = stint.lap_span() as f64;
    let (lo, hi) = config.window_band;
    let from_lap = ((stint.lap_start as f64 + span * lo).floor() as u32).max(stint.lap_start);
    let to_lap = ((stint.lap_start as f64 + span * hi).floor() as u32).max(from_lap);
    Some(PitWindow {
        from_lap,
        to_lap,
        reason: format!(
            "Degradation slope {:.3} s/lap exceeds threshold {:.3}",
            slope, config.alert_slope
        ),
    })
}
