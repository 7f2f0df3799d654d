//! Stint segmentation.
//!
//! Walks each driver's laps in order and opens a new stint whenever the
//! compound or the upstream stint id changes. When a session publishes
//! neither (every lap `UNKNOWN`, no stint column), the walk degenerates to
//! the documented fallback: one stint spanning the driver's whole session.
//!
//! Pit-in/out laps stay inside their stint — they anchor the lap ranges —
//! and are filtered out later by the pace and degradation inputs.

use std::collections::BTreeMap;

use crate::models::{LapRecord, Stint};

fn close_stint(run: &[&LapRecord], ordinal: u32) -> Stint {
    let first = run[0];
    let lap_start = run
        .iter()
        .map(|l| l.lap_number)
        .min()
        .unwrap_or(first.lap_number);
    let lap_end = run
        .iter()
        .map(|l| l.lap_number)
        .max()
        .unwrap_or(first.lap_number);
    Stint::new(
        first.driver.clone(),
        ordinal,
        first.compound,
        lap_start,
        lap_end,
        run.len() as u32,
    )
}

/// Segments normalized laps into per-driver stints.
///
/// Output is grouped by driver (alphabetical) with 1-based stint ordinals.
/// Per driver the stints are ordered, their lap ranges never overlap, and
/// together they cover every lap passed in.
pub fn segment_stints(laps: &[LapRecord]) -> Vec<Stint> {
    let mut by_driver: BTreeMap<&str, Vec<&LapRecord>> = BTreeMap::new();
    for lap in laps {
        by_driver.entry(lap.driver.as_str()).or_default().push(lap);
    }

    let mut stints = Vec::new();
    for (_, mut driver_laps) in by_driver {
        driver_laps.sort_by_key(|l| l.lap_number);

        let mut run: Vec<&LapRecord> = Vec::new();
        let mut ordinal = 0u32;
        for lap in driver_laps {
            let boundary = run.last().map_or(false, |prev| {
                prev.compound != lap.compound || prev.stint_id != lap.stint_id
            });
            if boundary {
                ordinal += 1;
                stints.push(close_stint(&run, ordinal));
                run.clear();
            }
            run.push(lap);
        }
        if !run.is_empty() {
            ordinal += 1;
            stints.push(close_stint(&run, ordinal));
        }
    }
    stints
}
