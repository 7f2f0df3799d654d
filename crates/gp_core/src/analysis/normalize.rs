//! Lap normalization.
//!
//! Single validation gate between schema-optional upstream rows and the
//! canonical [`LapRecord`]. Downstream code never re-checks presence of
//! driver, lap number or lap time; anything that fails here is dropped and
//! accounted for per row.

use crate::models::{Compound, LapRecord, NormalizedLaps, RawLap, RowError};

/// Integral check with tolerance for float noise in upstream counters.
fn as_counter(value: f64) -> Option<u32> {
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return None;
    }
    let rounded = value.round();
    if (value - rounded).abs() > 1e-9 {
        return None;
    }
    Some(rounded as u32)
}

/// Validates raw rows into canonical laps.
///
/// Drop rules: missing/blank driver, missing or non-integral lap number,
/// lap number below 1, missing or non-positive lap time. Everything else is
/// defaulted, never dropped: compound falls back to `UNKNOWN`, the accuracy
/// flag to `true`. Output is sorted by (driver, lap number).
pub fn normalize_laps(raws: &[RawLap]) -> NormalizedLaps {
    let mut laps = Vec::with_capacity(raws.len());
    let mut dropped = Vec::new();

    for (row, raw) in raws.iter().enumerate() {
        let driver = match raw.driver.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => {
                dropped.push(RowError { row, reason: "missing driver".into() });
                continue;
            }
        };
        let lap_number = match raw.lap_number {
            Some(n) => match as_counter(n) {
                Some(c) if c >= 1 => c,
                _ => {
                    dropped.push(RowError {
                        row,
                        reason: format!("invalid lap number: {}", n),
                    });
                    continue;
                }
            },
            None => {
                dropped.push(RowError { row, reason: "missing lap number".into() });
                continue;
            }
        };
        let lap_time_s = match raw.lap_time_s {
            Some(t) if t.is_finite() && t > 0.0 => t,
            Some(t) => {
                dropped.push(RowError { row, reason: format!("invalid lap time: {}", t) });
                continue;
            }
            None => {
                dropped.push(RowError { row, reason: "missing lap time".into() });
                continue;
            }
        };

        let compound = raw
            .compound
            .as_deref()
            .map(Compound::from_upstream)
            .unwrap_or_default();
        let stint_id = raw.stint.and_then(as_counter);

        laps.push(LapRecord {
            driver,
            lap_number,
            lap_time_s,
            compound,
            stint_id,
            pit_in: raw.pit_in_elapsed_s.is_some(),
            pit_out: raw.pit_out_elapsed_s.is_some(),
            elapsed_s: raw.elapsed_s.filter(|t| t.is_finite()),
            is_accurate: raw.is_accurate.unwrap_or(true),
            team: raw.team.clone(),
        });
    }

    laps.sort_by(|a, b| {
        a.driver
            .cmp(&b.driver)
            .then(a.lap_number.cmp(&b.lap_number))
    });
    NormalizedLaps { laps, dropped }
}
