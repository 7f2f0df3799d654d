//! Strength tables: classified results in, win-probability scores out.
//!
//! Every softmax tier funnels through here. A "strength" is any positive
//! score that orders the field (inverse position, season points, inverse
//! mean qualifying position); the softmax turns it into probabilities that
//! sum to one over the candidate set.

use std::collections::HashMap;

use crate::models::OutcomeScore;
use crate::stats;
use crate::telemetry::SessionResult;

/// What a season-prior strength was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthBasis {
    RacePoints,
    QualifyingAverage,
}

/// One entrant's raw strength score, before softmax.
#[derive(Debug, Clone)]
pub struct StrengthEntry {
    pub driver: String,
    pub team: Option<String>,
    pub score: f64,
}

/// Memoizable strength table for one season.
#[derive(Debug, Clone)]
pub struct SeasonStrength {
    pub entries: Vec<StrengthEntry>,
    pub basis: StrengthBasis,
}

/// Live strengths: inverse classified position. Unclassified rows (no
/// position) drop out of the candidate set.
pub fn live_strengths(results: &[SessionResult]) -> Vec<StrengthEntry> {
    results
        .iter()
        .filter_map(|r| {
            let pos = r.position?;
            if !pos.is_finite() {
                return None;
            }
            Some(StrengthEntry {
                driver: r.driver.clone(),
                team: r.team.clone(),
                score: 1.0 / pos.max(1.0),
            })
        })
        .collect()
}

/// Sums race points per driver across a season's rounds. Teams stick to the
/// first one seen. `None` when the season awarded no points at all.
pub fn points_strength(rounds: &[Vec<SessionResult>]) -> Option<SeasonStrength> {
    let mut order: Vec<String> = Vec::new();
    let mut points: HashMap<String, f64> = HashMap::new();
    let mut teams: HashMap<String, String> = HashMap::new();
    for round in rounds {
        for r in round {
            if !points.contains_key(&r.driver) {
                order.push(r.driver.clone());
            }
            *points.entry(r.driver.clone()).or_insert(0.0) += r.points.unwrap_or(0.0);
            if let Some(team) = &r.team {
                teams.entry(r.driver.clone()).or_insert_with(|| team.clone());
            }
        }
    }
    let total: f64 = points.values().sum();
    if total <= 0.0 {
        return None;
    }
    let entries = order
        .into_iter()
        .map(|driver| StrengthEntry {
            score: points.get(&driver).copied().unwrap_or(0.0),
            team: teams.get(&driver).cloned(),
            driver,
        })
        .collect();
    Some(SeasonStrength { entries, basis: StrengthBasis::RacePoints })
}

/// Fallback when a season carries no points: inverse mean qualifying
/// position. `None` when no round classified anyone.
pub fn quali_strength(rounds: &[Vec<SessionResult>]) -> Option<SeasonStrength> {
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, (f64, u32)> = HashMap::new();
    let mut teams: HashMap<String, String> = HashMap::new();
    for round in rounds {
        for r in round {
            let pos = match r.position {
                Some(p) if p.is_finite() => p,
                _ => continue,
            };
            if !sums.contains_key(&r.driver) {
                order.push(r.driver.clone());
            }
            let slot = sums.entry(r.driver.clone()).or_insert((0.0, 0));
            slot.0 += pos;
            slot.1 += 1;
            if let Some(team) = &r.team {
                teams.entry(r.driver.clone()).or_insert_with(|| team.clone());
            }
        }
    }
    if order.is_empty() {
        return None;
    }
    let entries = order
        .into_iter()
        .map(|driver| {
            let (sum, n) = sums.get(&driver).copied().unwrap_or((0.0, 1));
            let mean = sum / n.max(1) as f64;
            StrengthEntry {
                score: 1.0 / mean.max(1.0),
                team: teams.get(&driver).cloned(),
                driver,
            }
        })
        .collect();
    Some(SeasonStrength { entries, basis: StrengthBasis::QualifyingAverage })
}

/// Softmax over strengths, ranked descending. In these tiers a driver's
/// `p_top3` mirrors its own probability mass.
pub fn softmax_table(entries: &[StrengthEntry]) -> Vec<OutcomeScore> {
    let scores: Vec<f64> = entries.iter().map(|e| e.score).collect();
    let probs = stats::softmax(&scores);
    let mut ranked: Vec<OutcomeScore> = entries
        .iter()
        .zip(probs)
        .map(|(e, p)| OutcomeScore {
            driver: e.driver.clone(),
            team: e.team.clone(),
            p_win: p,
            p_top3: p,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.p_win
            .partial_cmp(&a.p_win)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(driver: &str, pos: f64, points: f64) -> SessionResult {
        SessionResult {
            driver: driver.into(),
            position: Some(pos),
            team: Some(format!("Team {}", driver)),
            points: Some(points),
            grid: None,
        }
    }

    #[test]
    fn live_strengths_invert_position() {
        let results = vec![result("A", 1.0, 25.0), result("B", 4.0, 12.0)];
        let entries = live_strengths(&results);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].score, 1.0);
        assert_eq!(entries[1].score, 0.25);
    }

    #[test]
    fn unclassified_rows_leave_the_candidate_set() {
        let mut dnf = result("C", 0.0, 0.0);
        dnf.position = None;
        let entries = live_strengths(&[result("A", 1.0, 25.0), dnf]);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn points_strength_accumulates_across_rounds() {
        let rounds = vec![
            vec![result("A", 1.0, 25.0), result("B", 2.0, 18.0)],
            vec![result("B", 1.0, 25.0), result("A", 2.0, 18.0)],
        ];
        let strength = points_strength(&rounds).unwrap();
        assert_eq!(strength.basis, StrengthBasis::RacePoints);
        let a = strength.entries.iter().find(|e| e.driver == "A").unwrap();
        let b = strength.entries.iter().find(|e| e.driver == "B").unwrap();
        assert_eq!(a.score, 43.0);
        assert_eq!(b.score, 43.0);
    }

    #[test]
    fn pointless_season_falls_back_to_none() {
        let rounds = vec![vec![result("A", 1.0, 0.0)]];
        assert!(points_strength(&rounds).is_none());
    }

    #[test]
    fn quali_strength_uses_inverse_mean_position() {
        let rounds = vec![
            vec![result("A", 1.0, 0.0), result("B", 3.0, 0.0)],
            vec![result("A", 3.0, 0.0), result("B", 5.0, 0.0)],
        ];
        let strength = quali_strength(&rounds).unwrap();
        assert_eq!(strength.basis, StrengthBasis::QualifyingAverage);
        let a = strength.entries.iter().find(|e| e.driver == "A").unwrap();
        let b = strength.entries.iter().find(|e| e.driver == "B").unwrap();
        assert!((a.score - 0.5).abs() < 1e-12); // mean 2.0
        assert!((b.score - 0.25).abs() < 1e-12); // mean 4.0
    }

    #[test]
    fn softmax_table_ranks_descending_and_sums_to_one() {
        let entries = vec![
            StrengthEntry { driver: "B".into(), team: None, score: 0.25 },
            StrengthEntry { driver: "A".into(), team: None, score: 1.0 },
        ];
        let table = softmax_table(&entries);
        assert_eq!(table[0].driver, "A");
        let sum: f64 = table.iter().map(|s| s.p_win).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(table[0].p_win, table[0].p_top3);
    }
}
