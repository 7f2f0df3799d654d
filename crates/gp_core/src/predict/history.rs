//! Win and podium tallies over prior editions of a single event.

use std::collections::HashMap;

use crate::models::OutcomeScore;
use crate::telemetry::SessionResult;

/// Accumulates classified finishes from past editions of one event and
/// turns them into empirical win / top-3 frequencies.
#[derive(Debug, Default)]
pub struct EventTally {
    order: Vec<String>,
    wins: HashMap<String, u32>,
    top3: HashMap<String, u32>,
    teams: HashMap<String, String>,
    seasons_used: u32,
}

impl EventTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seasons_used(&self) -> u32 {
        self.seasons_used
    }

    /// Feeds one prior edition. Editions with no classified rows do not
    /// count toward `seasons_used`.
    pub fn add_season(&mut self, results: &[SessionResult]) {
        let mut rows: Vec<&SessionResult> = results
            .iter()
            .filter(|r| r.position.map_or(false, f64::is_finite))
            .collect();
        rows.sort_by(|a, b| {
            a.position
                .partial_cmp(&b.position)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if rows.is_empty() {
            return;
        }
        self.seasons_used += 1;
        if let Some(winner) = rows.first() {
            self.note_driver(&winner.driver);
            *self.wins.entry(winner.driver.clone()).or_insert(0) += 1;
        }
        for row in rows.iter().take(3) {
            self.note_driver(&row.driver);
            *self.top3.entry(row.driver.clone()).or_insert(0) += 1;
        }
        for row in rows.iter().take(10) {
            if let Some(team) = &row.team {
                self.teams
                    .entry(row.driver.clone())
                    .or_insert_with(|| team.clone());
            }
        }
    }

    fn note_driver(&mut self, driver: &str) {
        if !self.wins.contains_key(driver) && !self.top3.contains_key(driver) {
            self.order.push(driver.to_string());
        }
    }

    /// Ranked table of empirical frequencies, first by win rate then by
    /// podium rate. Empty until at least one edition was tallied.
    pub fn to_scores(&self) -> Vec<OutcomeScore> {
        if self.seasons_used == 0 {
            return Vec::new();
        }
        let n = f64::from(self.seasons_used);
        let mut out: Vec<OutcomeScore> = self
            .order
            .iter()
            .map(|driver| OutcomeScore {
                driver: driver.clone(),
                team: self.teams.get(driver).cloned(),
                p_win: f64::from(self.wins.get(driver).copied().unwrap_or(0)) / n,
                p_top3: f64::from(self.top3.get(driver).copied().unwrap_or(0)) / n,
            })
            .collect();
        out.sort_by(|a, b| {
            b.p_win
                .partial_cmp(&a.p_win)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    b.p_top3
                        .partial_cmp(&a.p_top3)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });
        out
    }
}
