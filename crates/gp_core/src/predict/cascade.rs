//! The outcome-probability cascade.
//!
//! Prediction requests walk a fixed ladder of data sources and stop at the
//! first one that can rank the field:
//!
//! 1. **live** — classified results of the session itself,
//! 2. **historical_event** — finishing orders of the same-named event in
//!    prior seasons,
//! 3. **season_prior** — championship form of the prior season.
//!
//! A tier that merely lacks data lets the request fall through; a provider
//! failure aborts the whole request. When every tier comes up empty the
//! cascade returns a [`NoDataNotice`] — an answer, not an error.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::config::CascadeConfig;
use crate::error::{CoreError, Result};
use crate::models::{
    NoDataNotice, OutcomeScore, PredictionOutcome, RacePrediction, SessionKind, SourceTier,
};
use crate::telemetry::{race_events, ScheduledEvent, SessionCode, SessionResult, TelemetryProvider};

use super::history::EventTally;
use super::strength::{self, SeasonStrength};

/// Why a tier produced no table.
enum TierMiss {
    /// A data condition: fall through to the next tier.
    Skip(String),
    /// A hard provider failure: abort the whole request.
    Fatal(CoreError),
}

type TierTable = std::result::Result<(Vec<OutcomeScore>, Option<u32>), TierMiss>;

/// Borrowed view over everything one prediction request needs. The service
/// constructs one per call; the only shared state is the season-strength
/// memo, which outlives the request.
pub struct OutcomeCascade<'a> {
    provider: &'a dyn TelemetryProvider,
    config: &'a CascadeConfig,
    memo: &'a Mutex<HashMap<u16, SeasonStrength>>,
}

impl<'a> OutcomeCascade<'a> {
    pub fn new(
        provider: &'a dyn TelemetryProvider,
        config: &'a CascadeConfig,
        memo: &'a Mutex<HashMap<u16, SeasonStrength>>,
    ) -> Self {
        Self { provider, config, memo }
    }

    /// Runs the ladder for one event.
    pub fn predict(
        &self,
        season: u16,
        round: u32,
        kind: SessionKind,
    ) -> Result<PredictionOutcome> {
        let event = self.event_name(season, round)?;

        match self.live_tier(season, round, kind) {
            Ok((ranked, _)) => {
                return Ok(answered(season, round, event, kind, SourceTier::Live, ranked, None));
            }
            Err(TierMiss::Fatal(e)) => return Err(e),
            Err(TierMiss::Skip(reason)) => {
                log::debug!("live tier skipped for {} round {}: {}", season, round, reason);
            }
        }

        match self.historical_tier(season, kind, event.as_deref()) {
            Ok((ranked, seasons_used)) => {
                return Ok(answered(
                    season,
                    round,
                    event,
                    kind,
                    SourceTier::HistoricalEvent,
                    ranked,
                    seasons_used,
                ));
            }
            Err(TierMiss::Fatal(e)) => return Err(e),
            Err(TierMiss::Skip(reason)) => {
                log::debug!("historical tier skipped for {} round {}: {}", season, round, reason);
            }
        }

        match self.season_prior_tier(season) {
            Ok((ranked, _)) => {
                return Ok(answered(
                    season,
                    round,
                    event,
                    kind,
                    SourceTier::SeasonPrior,
                    ranked,
                    None,
                ));
            }
            Err(TierMiss::Fatal(e)) => return Err(e),
            Err(TierMiss::Skip(reason)) => {
                log::debug!(
                    "season-prior tier skipped for {} round {}: {}",
                    season,
                    round,
                    reason
                );
            }
        }

        log::info!("no tier could rank {} round {}", season, round);
        Ok(PredictionOutcome::NoData(NoDataNotice {
            season,
            round,
            event,
            message: "no live, historical or prior-season data available".into(),
        }))
    }

    /// Resolves the event name from the season schedule. A missing schedule
    /// only blunts the historical tier; a broken provider aborts.
    fn event_name(&self, season: u16, round: u32) -> Result<Option<String>> {
        match self.provider.schedule(season) {
            Ok(schedule) => Ok(schedule
                .iter()
                .find(|e| e.round == round)
                .map(|e| e.name.clone())),
            Err(e) if e.is_not_available() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn live_tier(&self, season: u16, round: u32, kind: SessionKind) -> TierTable {
        let data = match self.provider.session(season, round, kind.session_code()) {
            Ok(data) => data,
            Err(e) if e.is_not_available() => return Err(TierMiss::Skip(e.to_string())),
            Err(e) => return Err(TierMiss::Fatal(e.into())),
        };
        let entries = strength::live_strengths(&data.results);
        if entries.is_empty() {
            return Err(TierMiss::Skip("session has no classified results".into()));
        }
        Ok((strength::softmax_table(&entries), None))
    }

    fn historical_tier(&self, season: u16, kind: SessionKind, event: Option<&str>) -> TierTable {
        let event = match event {
            Some(name) => name,
            None => {
                return Err(TierMiss::Skip(
                    "event name unresolved, cannot match prior editions".into(),
                ));
            }
        };
        let newest = season.saturating_sub(1);
        let oldest = self
            .config
            .min_season
            .max(season.saturating_sub(self.config.history_window));
        if newest < oldest {
            return Err(TierMiss::Skip(format!("no archive seasons before {}", season)));
        }
        let mut tally = EventTally::new();
        for prior in (oldest..=newest).rev() {
            let schedule = match self.provider.schedule(prior) {
                Ok(s) => s,
                Err(e) if e.is_not_available() => continue,
                Err(e) => return Err(TierMiss::Fatal(e.into())),
            };
            let prior_round = match schedule.iter().find(|e| e.name == event) {
                Some(entry) => entry.round,
                None => continue,
            };
            match self.provider.session(prior, prior_round, kind.session_code()) {
                Ok(data) => tally.add_season(&data.results),
                Err(e) if e.is_not_available() => continue,
                Err(e) => return Err(TierMiss::Fatal(e.into())),
            }
        }
        if tally.seasons_used() == 0 {
            return Err(TierMiss::Skip(format!("no prior editions of {} found", event)));
        }
        let used = tally.seasons_used();
        Ok((tally.to_scores(), Some(used)))
    }

    fn season_prior_tier(&self, season: u16) -> TierTable {
        let prior = self.config.min_season.max(season.saturating_sub(1));
        if let Some(hit) = self.lock_memo().get(&prior) {
            log::debug!("season {} strength served from memo", prior);
            return Ok((strength::softmax_table(&hit.entries), None));
        }
        let built = self.build_season_strength(prior)?;
        let table = strength::softmax_table(&built.entries);
        self.lock_memo().insert(prior, built);
        Ok((table, None))
    }

    /// Points-based strength for one season, with an inverse-mean-qualifying
    /// fallback for seasons that awarded no points.
    fn build_season_strength(
        &self,
        prior: u16,
    ) -> std::result::Result<SeasonStrength, TierMiss> {
        let schedule = match self.provider.schedule(prior) {
            Ok(s) => s,
            Err(e) if e.is_not_available() => {
                return Err(TierMiss::Skip(format!("no schedule for season {}", prior)));
            }
            Err(e) => return Err(TierMiss::Fatal(e.into())),
        };
        let rounds = race_events(&schedule);
        if rounds.is_empty() {
            return Err(TierMiss::Skip(format!(
                "season {} has no championship rounds",
                prior
            )));
        }
        let races = self.collect_results(prior, &rounds, SessionCode::R)?;
        if let Some(built) = strength::points_strength(&races) {
            return Ok(built);
        }
        let qualis = self.collect_results(prior, &rounds, SessionCode::Q)?;
        strength::quali_strength(&qualis)
            .ok_or_else(|| TierMiss::Skip(format!("season {} has no usable results", prior)))
    }

    fn collect_results(
        &self,
        season: u16,
        rounds: &[ScheduledEvent],
        code: SessionCode,
    ) -> std::result::Result<Vec<Vec<SessionResult>>, TierMiss> {
        let mut collected = Vec::new();
        for event in rounds {
            match self.provider.session(season, event.round, code) {
                Ok(data) => collected.push(data.results),
                Err(e) if e.is_not_available() => continue,
                Err(e) => return Err(TierMiss::Fatal(e.into())),
            }
        }
        Ok(collected)
    }

    fn lock_memo(&self) -> MutexGuard<'a, HashMap<u16, SeasonStrength>> {
        match self.memo.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn answered(
    season: u16,
    round: u32,
    event: Option<String>,
    kind: SessionKind,
    source: SourceTier,
    ranked: Vec<OutcomeScore>,
    seasons_used: Option<u32>,
) -> PredictionOutcome {
    log::info!(
        "{} prediction for {} round {}: {} tier, {} candidates",
        kind.as_str(),
        season,
        round,
        source.as_str(),
        ranked.len()
    );
    PredictionOutcome::Ranked(RacePrediction {
        season,
        round,
        event,
        kind,
        source,
        ranked,
        seasons_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{MemoryProvider, SessionData};

    fn classified(spec: &[(&str, f64, f64)]) -> Vec<SessionResult> {
        spec.iter()
            .map(|(driver, pos, points)| SessionResult {
                driver: (*driver).into(),
                position: Some(*pos),
                team: Some(format!("{} Racing", driver)),
                points: Some(*points),
                grid: None,
            })
            .collect()
    }

    fn session_with_results(results: Vec<SessionResult>) -> SessionData {
        SessionData { laps: Vec::new(), results, weather: Vec::new() }
    }

    fn event(round: u32, name: &str) -> ScheduledEvent {
        ScheduledEvent { round, name: name.into(), is_testing: false }
    }

    fn predict(
        provider: &MemoryProvider,
        season: u16,
        round: u32,
        kind: SessionKind,
    ) -> PredictionOutcome {
        let config = CascadeConfig::default();
        let memo = Mutex::new(HashMap::new());
        OutcomeCascade::new(provider, &config, &memo)
            .predict(season, round, kind)
            .unwrap()
    }

    #[test]
    fn live_results_answer_first() {
        let provider = MemoryProvider::new()
            .with_schedule(2024, vec![event(4, "Spanish Grand Prix")])
            .with_session(
                2024,
                4,
                SessionCode::R,
                session_with_results(classified(&[
                    ("VER", 1.0, 25.0),
                    ("NOR", 2.0, 18.0),
                    ("LEC", 3.0, 15.0),
                ])),
            );
        let outcome = predict(&provider, 2024, 4, SessionKind::Race);
        let p = outcome.prediction().unwrap();
        assert_eq!(p.source, SourceTier::Live);
        assert_eq!(p.event.as_deref(), Some("Spanish Grand Prix"));
        assert_eq!(p.ranked[0].driver, "VER");
        assert!((p.probability_sum() - 1.0).abs() < 1e-9);
        assert_eq!(p.seasons_used, None);
    }

    #[test]
    fn missing_session_falls_through_to_historical_editions() {
        let provider = MemoryProvider::new()
            .with_schedule(2024, vec![event(4, "Spanish Grand Prix")])
            .with_schedule(2023, vec![event(7, "Spanish Grand Prix")])
            .with_schedule(2022, vec![event(6, "Spanish Grand Prix")])
            .with_session(
                2023,
                7,
                SessionCode::R,
                session_with_results(classified(&[
                    ("VER", 1.0, 25.0),
                    ("HAM", 2.0, 18.0),
                    ("SAI", 3.0, 15.0),
                ])),
            )
            .with_session(
                2022,
                6,
                SessionCode::R,
                session_with_results(classified(&[
                    ("VER", 1.0, 25.0),
                    ("SAI", 2.0, 18.0),
                    ("HAM", 3.0, 15.0),
                ])),
            );
        let outcome = predict(&provider, 2024, 4, SessionKind::Race);
        let p = outcome.prediction().unwrap();
        assert_eq!(p.source, SourceTier::HistoricalEvent);
        assert_eq!(p.seasons_used, Some(2));
        assert_eq!(p.ranked[0].driver, "VER");
        assert_eq!(p.ranked[0].p_win, 1.0);
        let ham = p.ranked.iter().find(|s| s.driver == "HAM").unwrap();
        assert_eq!(ham.p_win, 0.0);
        assert_eq!(ham.p_top3, 1.0);
    }

    #[test]
    fn history_walk_respects_the_window() {
        // Same-named event won by VER in every season the window covers and
        // by a different driver just outside it.
        let mut provider = MemoryProvider::new().with_schedule(2024, vec![event(1, "Bahrain Grand Prix")]);
        for prior in 2018..=2023u16 {
            provider = provider
                .with_schedule(prior, vec![event(1, "Bahrain Grand Prix")])
                .with_session(
                    prior,
                    1,
                    SessionCode::R,
                    session_with_results(classified(&[
                        (if prior == 2018 { "VET" } else { "VER" }, 1.0, 25.0),
                        ("BOT", 2.0, 18.0),
                    ])),
                );
        }
        let outcome = predict(&provider, 2024, 1, SessionKind::Race);
        let p = outcome.prediction().unwrap();
        assert_eq!(p.source, SourceTier::HistoricalEvent);
        // 2019..=2023 inspected; 2018 falls outside the five-season window.
        assert_eq!(p.seasons_used, Some(5));
        assert!(p.ranked.iter().all(|s| s.driver != "VET"));
        assert_eq!(p.ranked[0].driver, "VER");
        assert_eq!(p.ranked[0].p_win, 1.0);
    }

    #[test]
    fn history_walk_includes_the_archive_floor_season() {
        // The oldest inspectable season is min_season itself, not the year
        // after it: predicting 2019 still reads the 2018 edition.
        let provider = MemoryProvider::new()
            .with_schedule(2019, vec![event(1, "Australian Grand Prix")])
            .with_schedule(2018, vec![event(1, "Australian Grand Prix")])
            .with_session(
                2018,
                1,
                SessionCode::R,
                session_with_results(classified(&[("VET", 1.0, 25.0), ("HAM", 2.0, 18.0)])),
            );
        let outcome = predict(&provider, 2019, 1, SessionKind::Race);
        let p = outcome.prediction().unwrap();
        assert_eq!(p.source, SourceTier::HistoricalEvent);
        assert_eq!(p.seasons_used, Some(1));
        assert_eq!(p.ranked[0].driver, "VET");
    }

    #[test]
    fn future_event_falls_back_to_prior_season_form() {
        let provider = MemoryProvider::new()
            .with_schedule(
                2029,
                vec![event(1, "Bahrain Grand Prix"), event(2, "Saudi Arabian Grand Prix")],
            )
            .with_session(
                2029,
                1,
                SessionCode::R,
                session_with_results(classified(&[("PIA", 1.0, 25.0), ("RUS", 2.0, 18.0)])),
            )
            .with_session(
                2029,
                2,
                SessionCode::R,
                session_with_results(classified(&[("PIA", 1.0, 25.0), ("RUS", 2.0, 18.0)])),
            );
        let memo = Mutex::new(HashMap::new());
        let config = CascadeConfig::default();
        let cascade = OutcomeCascade::new(&provider, &config, &memo);
        let outcome = cascade.predict(2030, 1, SessionKind::Race).unwrap();
        let p = outcome.prediction().unwrap();
        assert_eq!(p.source, SourceTier::SeasonPrior);
        assert_eq!(p.ranked[0].driver, "PIA");
        assert!(p.ranked[0].p_win > p.ranked[1].p_win);
        assert!((p.probability_sum() - 1.0).abs() < 1e-9);
        // The strength table is memoized for the next request.
        assert!(memo.lock().unwrap().contains_key(&2029));
    }

    #[test]
    fn empty_ladder_ends_in_a_no_data_notice() {
        let provider = MemoryProvider::new();
        let outcome = predict(&provider, 2031, 9, SessionKind::Race);
        assert!(outcome.is_no_data());
        match outcome {
            PredictionOutcome::NoData(notice) => {
                assert_eq!(notice.season, 2031);
                assert_eq!(notice.round, 9);
                assert!(notice.event.is_none());
            }
            PredictionOutcome::Ranked(_) => panic!("expected a no-data notice"),
        }
    }

    #[test]
    fn provider_failure_aborts_instead_of_falling_through() {
        let provider = MemoryProvider::new()
            .with_schedule(2024, vec![event(4, "Spanish Grand Prix")])
            .with_failure(2024, 4, SessionCode::R, "backend unreachable");
        let config = CascadeConfig::default();
        let memo = Mutex::new(HashMap::new());
        let result = OutcomeCascade::new(&provider, &config, &memo).predict(
            2024,
            4,
            SessionKind::Race,
        );
        assert!(matches!(result, Err(CoreError::Telemetry(_))));
    }

    #[test]
    fn qualifying_predictions_read_the_qualifying_session() {
        let provider = MemoryProvider::new()
            .with_schedule(2024, vec![event(4, "Spanish Grand Prix")])
            .with_session(
                2024,
                4,
                SessionCode::Q,
                session_with_results(classified(&[("NOR", 1.0, 0.0), ("VER", 2.0, 0.0)])),
            );
        let quali = predict(&provider, 2024, 4, SessionKind::Qualifying);
        let p = quali.prediction().unwrap();
        assert_eq!(p.source, SourceTier::Live);
        assert_eq!(p.kind, SessionKind::Qualifying);
        assert_eq!(p.ranked[0].driver, "NOR");

        // The race run of the same request has no race session to read and
        // no prior editions loaded, so it cannot answer from the live tier.
        let race = predict(&provider, 2024, 4, SessionKind::Race);
        assert!(race.is_no_data());
    }

    #[test]
    fn pointless_prior_season_falls_back_to_qualifying_form() {
        let provider = MemoryProvider::new()
            .with_schedule(2029, vec![event(1, "Bahrain Grand Prix")])
            .with_session(
                2029,
                1,
                SessionCode::R,
                session_with_results(classified(&[("GAS", 1.0, 0.0), ("OCO", 2.0, 0.0)])),
            )
            .with_session(
                2029,
                1,
                SessionCode::Q,
                session_with_results(classified(&[("OCO", 1.0, 0.0), ("GAS", 2.0, 0.0)])),
            );
        let outcome = predict(&provider, 2030, 1, SessionKind::Race);
        let p = outcome.prediction().unwrap();
        assert_eq!(p.source, SourceTier::SeasonPrior);
        // Points were all zero, so qualifying order decides.
        assert_eq!(p.ranked[0].driver, "OCO");
    }
}
