//! The analytics service.
//!
//! [`RaceAnalytics`] wires a telemetry provider to the analysis, prediction
//! and simulation engines and fronts the report builders with read-through
//! caches. One instance is meant to live for the whole process and be
//! shared across threads.
//!
//! Missing upstream data never fails a report: builders return an empty
//! report carrying a `message`, served transiently so the answer is
//! recomputed once the data exists. Only hard provider failures surface as
//! errors.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;

use crate::analysis::{degradation, evolution, normalize, pit_effect, segment, strategy};
use crate::cache::{Computed, ReportCache, ReportKey};
use crate::config::AnalyticsConfig;
use crate::error::{CoreError, Result};
use crate::models::{
    AnalysisParams, DegradationReport, DriverTyres, EvolutionReport, NoDataNotice, OutcomeScore,
    PredictionOutcome, RacePrediction, SessionKind, SimulationResult, SourceTier, StrategyReport,
    TyreReport,
};
use crate::predict::{features, OutcomeCascade, SeasonStrength, WinProbabilityModel};
use crate::sim;
use crate::telemetry::{race_events, ScheduledEvent, SessionCode, SessionData, TelemetryProvider};

pub struct RaceAnalytics<P: TelemetryProvider> {
    provider: P,
    config: AnalyticsConfig,
    model: Option<Box<dyn WinProbabilityModel>>,
    season_strength: Mutex<HashMap<u16, SeasonStrength>>,
    strategy_cache: ReportCache<StrategyReport>,
    degradation_cache: ReportCache<DegradationReport>,
    tyre_cache: ReportCache<TyreReport>,
    evolution_cache: ReportCache<EvolutionReport>,
}

impl<P: TelemetryProvider> RaceAnalytics<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, AnalyticsConfig::default())
    }

    pub fn with_config(provider: P, config: AnalyticsConfig) -> Self {
        Self::build(provider, config, None)
    }

    /// Like [`with_config`](Self::with_config), with reports additionally
    /// persisted as JSON files under `dir`.
    pub fn with_cache_dir(provider: P, config: AnalyticsConfig, dir: impl Into<PathBuf>) -> Self {
        Self::build(provider, config, Some(dir.into()))
    }

    /// Attaches an externally trained win-probability model, enabling
    /// [`predict_with_model`](Self::predict_with_model).
    pub fn with_model(mut self, model: Box<dyn WinProbabilityModel>) -> Self {
        self.model = Some(model);
        self
    }

    fn build(provider: P, config: AnalyticsConfig, dir: Option<PathBuf>) -> Self {
        Self {
            provider,
            config,
            model: None,
            season_strength: Mutex::new(HashMap::new()),
            strategy_cache: ReportCache::with_dir("strategy", dir.clone()),
            degradation_cache: ReportCache::with_dir("degradation", dir.clone()),
            tyre_cache: ReportCache::with_dir("tyres", dir.clone()),
            evolution_cache: ReportCache::with_dir("evolution", dir),
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Drops every in-memory report. Files in the cache directory stay.
    pub fn clear_caches(&self) {
        self.strategy_cache.clear();
        self.degradation_cache.clear();
        self.tyre_cache.clear();
        self.evolution_cache.clear();
    }

    // ========================================================================
    // Session reports
    // ========================================================================

    /// Per-driver strategy picture: stints with pace and degradation, pit
    /// laps, pit effects and suggested pit windows.
    pub fn strategy_report(
        &self,
        season: u16,
        round: u32,
        code: SessionCode,
    ) -> Result<StrategyReport> {
        let key = ReportKey { season, round, session: code };
        self.strategy_cache
            .get_or_compute(key, || self.build_strategy(season, round, code))
    }

    /// Flattened degradation table: every stint in the session with its
    /// linear fit, ordered by (lap_start, compound).
    pub fn tyre_degradation(
        &self,
        season: u16,
        round: u32,
        code: SessionCode,
    ) -> Result<DegradationReport> {
        let key = ReportKey { season, round, session: code };
        self.degradation_cache
            .get_or_compute(key, || self.build_degradation(season, round, code))
    }

    /// Raw stint layout of the session, no analytics attached.
    pub fn tyre_stints(&self, season: u16, round: u32, code: SessionCode) -> Result<TyreReport> {
        let key = ReportKey { season, round, session: code };
        self.tyre_cache
            .get_or_compute(key, || self.build_tyres(season, round, code))
    }

    /// Weather trace plus the track-evolution index over session time.
    pub fn track_evolution(
        &self,
        season: u16,
        round: u32,
        code: SessionCode,
    ) -> Result<EvolutionReport> {
        let key = ReportKey { season, round, session: code };
        self.evolution_cache
            .get_or_compute(key, || self.build_evolution(season, round, code))
    }

    fn build_strategy(
        &self,
        season: u16,
        round: u32,
        code: SessionCode,
    ) -> Result<Computed<StrategyReport>> {
        let params = AnalysisParams {
            pace: self.config.pace.clone(),
            pit: self.config.pit.clone(),
        };
        let empty = |message: &str, rows_dropped: usize| StrategyReport {
            season,
            round,
            session: code,
            drivers: Vec::new(),
            params: params.clone(),
            rows_dropped,
            message: Some(message.to_string()),
            generated_at: Utc::now(),
        };
        let data = match self.try_session(season, round, code)? {
            Some(data) => data,
            None => return Ok(Computed::Transient(empty("session data not available", 0))),
        };
        let normalized = normalize::normalize_laps(&data.laps);
        if normalized.laps.is_empty() {
            return Ok(Computed::Transient(empty(
                "session has no usable laps",
                normalized.dropped.len(),
            )));
        }
        let drivers = strategy::driver_strategies(&normalized.laps, &params);
        Ok(Computed::Cacheable(StrategyReport {
            season,
            round,
            session: code,
            drivers,
            params,
            rows_dropped: normalized.dropped.len(),
            message: None,
            generated_at: Utc::now(),
        }))
    }

    fn build_degradation(
        &self,
        season: u16,
        round: u32,
        code: SessionCode,
    ) -> Result<Computed<DegradationReport>> {
        let empty = |message: &str| DegradationReport {
            season,
            round,
            session: code,
            stints: Vec::new(),
            params: self.config.pace.clone(),
            note: degradation::DEGRADATION_NOTE.to_string(),
            message: Some(message.to_string()),
            generated_at: Utc::now(),
        };
        let data = match self.try_session(season, round, code)? {
            Some(data) => data,
            None => return Ok(Computed::Transient(empty("session data not available"))),
        };
        let normalized = normalize::normalize_laps(&data.laps);
        if normalized.laps.is_empty() {
            return Ok(Computed::Transient(empty("session has no usable laps")));
        }
        let stints = degradation::session_stints(&normalized.laps, &self.config.pace);
        Ok(Computed::Cacheable(DegradationReport {
            season,
            round,
            session: code,
            stints,
            params: self.config.pace.clone(),
            note: degradation::DEGRADATION_NOTE.to_string(),
            message: None,
            generated_at: Utc::now(),
        }))
    }

    fn build_tyres(
        &self,
        season: u16,
        round: u32,
        code: SessionCode,
    ) -> Result<Computed<TyreReport>> {
        let empty = |message: &str| TyreReport {
            season,
            round,
            session: code,
            total_laps: 0,
            drivers: Vec::new(),
            message: Some(message.to_string()),
            generated_at: Utc::now(),
        };
        let data = match self.try_session(season, round, code)? {
            Some(data) => data,
            None => return Ok(Computed::Transient(empty("session data not available"))),
        };
        let normalized = normalize::normalize_laps(&data.laps);
        if normalized.laps.is_empty() {
            return Ok(Computed::Transient(empty("session has no usable laps")));
        }
        let mut by_driver: BTreeMap<String, DriverTyres> = BTreeMap::new();
        for stint in segment::segment_stints(&normalized.laps) {
            let entry = by_driver
                .entry(stint.driver.clone())
                .or_insert_with(|| DriverTyres {
                    driver: stint.driver.clone(),
                    stints: Vec::new(),
                    pit_laps: pit_effect::pit_laps(&normalized.laps, &stint.driver),
                });
            entry.stints.push(stint);
        }
        let total_laps = normalized
            .laps
            .iter()
            .map(|l| l.lap_number)
            .max()
            .unwrap_or(0);
        Ok(Computed::Cacheable(TyreReport {
            season,
            round,
            session: code,
            total_laps,
            drivers: by_driver.into_values().collect(),
            message: None,
            generated_at: Utc::now(),
        }))
    }

    fn build_evolution(
        &self,
        season: u16,
        round: u32,
        code: SessionCode,
    ) -> Result<Computed<EvolutionReport>> {
        let empty = |message: &str| EvolutionReport {
            season,
            round,
            session: code,
            weather: Vec::new(),
            evolution: Vec::new(),
            params: self.config.evolution.clone(),
            message: Some(message.to_string()),
            generated_at: Utc::now(),
        };
        let data = match self.try_session(season, round, code)? {
            Some(data) => data,
            None => return Ok(Computed::Transient(empty("session data not available"))),
        };
        let normalized = normalize::normalize_laps(&data.laps);
        if normalized.laps.is_empty() {
            // Weather may already be streaming before any car has lapped;
            // pass it through, but never pin the lap-less report.
            let mut report = empty("session has no usable laps");
            report.weather = data.weather;
            return Ok(Computed::Transient(report));
        }
        let points = evolution::evolution_points(&normalized.laps, &self.config.evolution);
        let message = if points.is_empty() {
            Some("no clean timed laps to build the evolution index from".to_string())
        } else {
            None
        };
        Ok(Computed::Cacheable(EvolutionReport {
            season,
            round,
            session: code,
            weather: data.weather,
            evolution: points,
            params: self.config.evolution.clone(),
            message,
            generated_at: Utc::now(),
        }))
    }

    // ========================================================================
    // Predictions
    // ========================================================================

    /// Race-winner probabilities for one event, from the best tier of the
    /// cascade. `topk` trims the table to the strongest candidates (never
    /// fewer than three).
    pub fn predict_race(
        &self,
        season: u16,
        round: u32,
        topk: Option<usize>,
    ) -> Result<PredictionOutcome> {
        self.predict(season, round, SessionKind::Race, topk)
    }

    /// Pole-position probabilities, same cascade over qualifying sessions.
    pub fn predict_qualifying(
        &self,
        season: u16,
        round: u32,
        topk: Option<usize>,
    ) -> Result<PredictionOutcome> {
        self.predict(season, round, SessionKind::Qualifying, topk)
    }

    fn predict(
        &self,
        season: u16,
        round: u32,
        kind: SessionKind,
        topk: Option<usize>,
    ) -> Result<PredictionOutcome> {
        let cascade =
            OutcomeCascade::new(&self.provider, &self.config.cascade, &self.season_strength);
        let outcome = cascade.predict(season, round, kind)?;
        Ok(truncate_outcome(outcome, topk))
    }

    /// Ranks the race field with the attached classifier over qualifying
    /// features instead of the cascade.
    pub fn predict_with_model(
        &self,
        season: u16,
        round: u32,
        topk: Option<usize>,
    ) -> Result<PredictionOutcome> {
        let model = self.model.as_deref().ok_or_else(|| {
            CoreError::InvalidParameter(
                "no win-probability model attached to the service".into(),
            )
        })?;
        let quali = match self.try_session(season, round, SessionCode::Q)? {
            Some(data) => data,
            None => {
                return Ok(PredictionOutcome::NoData(NoDataNotice {
                    season,
                    round,
                    event: self.event_name(season, round)?,
                    message: "no qualifying session to build features from".into(),
                }));
            }
        };
        let rows = features::rows_from_qualifying(season, round, &quali);
        if rows.is_empty() {
            return Ok(PredictionOutcome::NoData(NoDataNotice {
                season,
                round,
                event: self.event_name(season, round)?,
                message: "qualifying session has no entrants".into(),
            }));
        }
        let mut scores = Vec::with_capacity(rows.len());
        for row in &rows {
            let (_, p_win) = model.predict_proba(row)?;
            scores.push(if p_win.is_finite() { p_win.max(0.0) } else { 0.0 });
        }
        let total: f64 = scores.iter().sum();
        let uniform = 1.0 / rows.len() as f64;
        let mut ranked: Vec<OutcomeScore> = rows
            .iter()
            .zip(&scores)
            .map(|(row, &score)| {
                let p = if total > 0.0 { score / total } else { uniform };
                OutcomeScore {
                    driver: row.driver.clone(),
                    team: row.team.clone(),
                    p_win: p,
                    p_top3: p,
                }
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.p_win
                .partial_cmp(&a.p_win)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let prediction = RacePrediction {
            season,
            round,
            event: self.event_name(season, round)?,
            kind: SessionKind::Race,
            source: SourceTier::Model,
            ranked,
            seasons_used: None,
        };
        Ok(truncate_outcome(PredictionOutcome::Ranked(prediction), topk))
    }

    // ========================================================================
    // Season operations
    // ========================================================================

    /// Projects the championship: predicts every round of the season and
    /// simulates the points battle per the configured mode. Rounds the
    /// cascade cannot rank are skipped.
    pub fn simulate_championship(&self, season: u16) -> Result<SimulationResult> {
        let schedule = match self.provider.schedule(season) {
            Ok(s) => s,
            Err(e) if e.is_not_available() => {
                return Ok(SimulationResult {
                    season,
                    mode: self.config.simulation.mode,
                    trials: 0,
                    rounds: Vec::new(),
                    drivers: Vec::new(),
                    teams: Vec::new(),
                    message: Some(format!("no schedule available for season {}", season)),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let mut events = race_events(&schedule);
        if let Some(limit) = self.config.simulation.up_to_round {
            events.retain(|e| e.round <= limit);
        }
        let cascade =
            OutcomeCascade::new(&self.provider, &self.config.cascade, &self.season_strength);
        let mut predictions: Vec<RacePrediction> = Vec::with_capacity(events.len());
        for event in &events {
            match cascade.predict(season, event.round, SessionKind::Race)? {
                PredictionOutcome::Ranked(p) => predictions.push(p),
                PredictionOutcome::NoData(notice) => {
                    log::debug!(
                        "round {} skipped in simulation: {}",
                        notice.round,
                        notice.message
                    );
                }
            }
        }
        Ok(sim::project(season, &predictions, &self.config.simulation))
    }

    /// Championship rounds of a season, testing events excluded. An
    /// unpublished schedule is an empty list, not an error.
    pub fn season_events(&self, season: u16) -> Result<Vec<ScheduledEvent>> {
        match self.provider.schedule(season) {
            Ok(s) => Ok(race_events(&s)),
            Err(e) if e.is_not_available() => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    // ========================================================================
    // Provider plumbing
    // ========================================================================

    /// Fetches a session, mapping "not available" to `None` so report
    /// builders can answer with an empty transient report instead of
    /// failing.
    fn try_session(
        &self,
        season: u16,
        round: u32,
        code: SessionCode,
    ) -> Result<Option<SessionData>> {
        match self.provider.session(season, round, code) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.is_not_available() => {
                log::debug!("session {} round {} {} unavailable: {}", season, round, code, e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

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
}

/// Applies the top-k trim; a requested k is never taken below three.
fn truncate_outcome(outcome: PredictionOutcome, topk: Option<usize>) -> PredictionOutcome {
    let k = match topk {
        Some(k) => k.max(3),
        None => return outcome,
    };
    match outcome {
        PredictionOutcome::Ranked(mut p) => {
            p.ranked.truncate(k);
            PredictionOutcome::Ranked(p)
        }
        no_data => no_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeatureRow, RawLap};
    use crate::telemetry::{MemoryProvider, SessionResult, WeatherSample};

    fn lap(driver: &str, number: f64, time: f64, compound: &str) -> RawLap {
        RawLap {
            driver: Some(driver.into()),
            lap_number: Some(number),
            lap_time_s: Some(time),
            compound: Some(compound.into()),
            ..RawLap::default()
        }
    }

    fn classified(spec: &[(&str, f64)]) -> Vec<SessionResult> {
        spec.iter()
            .map(|(driver, pos)| SessionResult {
                driver: (*driver).into(),
                position: Some(*pos),
                team: Some(format!("{} Racing", driver)),
                points: Some(26.0 - *pos),
                grid: Some(*pos),
            })
            .collect()
    }

    fn event(round: u32, name: &str) -> ScheduledEvent {
        ScheduledEvent { round, name: name.into(), is_testing: false }
    }

    /// A race session: one degrading soft runner, one steady medium runner.
    fn race_laps() -> Vec<RawLap> {
        let mut laps = Vec::new();
        for i in 0..8u32 {
            laps.push(lap("VER", f64::from(i + 1), 88.1 + 0.1 * f64::from(i), "SOFT"));
            laps.push(lap("NOR", f64::from(i + 1), 89.0, "MEDIUM"));
        }
        laps
    }

    fn race_session() -> SessionData {
        SessionData {
            laps: race_laps(),
            results: classified(&[("VER", 1.0), ("NOR", 2.0)]),
            weather: Vec::new(),
        }
    }

    #[test]
    fn strategy_report_is_built_and_cached() {
        let provider =
            MemoryProvider::new().with_session(2024, 4, SessionCode::R, race_session());
        let service = RaceAnalytics::new(provider);
        let report = service.strategy_report(2024, 4, SessionCode::R).unwrap();
        assert_eq!(report.drivers.len(), 2);
        assert!(report.message.is_none());
        let ver = report.drivers.iter().find(|d| d.driver == "VER").unwrap();
        let nor = report.drivers.iter().find(|d| d.driver == "NOR").unwrap();
        assert!(ver.stints[0].suggested_pit_window.is_some());
        assert!(nor.stints[0].suggested_pit_window.is_none());
        assert_eq!(report.params.pace.min_fit_laps, 5);

        // A second request is served from cache: same generation instant.
        let again = service.strategy_report(2024, 4, SessionCode::R).unwrap();
        assert_eq!(again.generated_at, report.generated_at);
    }

    #[test]
    fn missing_session_yields_an_empty_report_with_message() {
        let service = RaceAnalytics::new(MemoryProvider::new());
        let report = service.strategy_report(2024, 4, SessionCode::R).unwrap();
        assert!(report.drivers.is_empty());
        assert!(report.message.is_some());

        let degradation = service.tyre_degradation(2024, 4, SessionCode::R).unwrap();
        assert!(degradation.stints.is_empty());
        assert!(degradation.message.is_some());

        let tyres = service.tyre_stints(2024, 4, SessionCode::R).unwrap();
        assert_eq!(tyres.total_laps, 0);
        assert!(tyres.message.is_some());

        let evolution = service.track_evolution(2024, 4, SessionCode::R).unwrap();
        assert!(evolution.evolution.is_empty());
        assert!(evolution.message.is_some());
    }

    #[test]
    fn tyre_report_lays_out_stints_per_driver() {
        let provider =
            MemoryProvider::new().with_session(2024, 4, SessionCode::R, race_session());
        let service = RaceAnalytics::new(provider);
        let report = service.tyre_stints(2024, 4, SessionCode::R).unwrap();
        assert_eq!(report.total_laps, 8);
        assert_eq!(report.drivers.len(), 2);
        // BTreeMap grouping: alphabetical driver order.
        assert_eq!(report.drivers[0].driver, "NOR");
        assert_eq!(report.drivers[0].stints.len(), 1);
        assert!(report.drivers[0].stints[0].pace_s.is_none(), "layout only, no analytics");
    }

    #[test]
    fn degradation_report_flattens_and_annotates() {
        let provider =
            MemoryProvider::new().with_session(2024, 4, SessionCode::R, race_session());
        let service = RaceAnalytics::new(provider);
        let report = service.tyre_degradation(2024, 4, SessionCode::R).unwrap();
        assert_eq!(report.stints.len(), 2);
        assert!(!report.note.is_empty());
        let soft = report
            .stints
            .iter()
            .find(|s| s.driver == "VER")
            .unwrap();
        let slope = soft.slope_s_per_lap.unwrap();
        assert!((slope - 0.1).abs() < 0.01);
    }

    #[test]
    fn weather_only_session_keeps_its_trace_and_explains_the_empty_index() {
        // Weather is published before a single lap has been turned.
        let session = SessionData {
            laps: Vec::new(),
            results: Vec::new(),
            weather: vec![WeatherSample {
                elapsed_s: 0.0,
                air_temp_c: Some(24.0),
                track_temp_c: Some(41.5),
                ..WeatherSample::default()
            }],
        };
        let provider =
            MemoryProvider::new().with_session(2024, 4, SessionCode::Fp1, session);
        let service = RaceAnalytics::new(provider);
        let report = service.track_evolution(2024, 4, SessionCode::Fp1).unwrap();
        assert!(report.evolution.is_empty());
        assert_eq!(report.weather.len(), 1);
        assert!(
            report.message.is_some(),
            "empty index without laps must say why"
        );
    }

    #[test]
    fn untimed_laps_yield_an_evolution_message_not_a_bare_empty_index() {
        // Valid laps, but none carries a session timestamp: the index has
        // nothing to bucket and must say so rather than look computed.
        let session = SessionData {
            laps: vec![lap("VER", 1.0, 90.0, "SOFT"), lap("VER", 2.0, 90.2, "SOFT")],
            results: Vec::new(),
            weather: Vec::new(),
        };
        let provider =
            MemoryProvider::new().with_session(2024, 4, SessionCode::Fp1, session);
        let service = RaceAnalytics::new(provider);
        let report = service.track_evolution(2024, 4, SessionCode::Fp1).unwrap();
        assert!(report.evolution.is_empty());
        assert!(
            report.message.is_some(),
            "empty index over untimed laps must say why"
        );
    }

    #[test]
    fn timed_laps_produce_an_evolution_index_without_message() {
        let mut laps = Vec::new();
        for i in 0..6u32 {
            let mut l = lap("VER", f64::from(i + 1), 90.0, "SOFT");
            l.elapsed_s = Some(f64::from(i) * 95.0);
            laps.push(l);
        }
        let session = SessionData { laps, results: Vec::new(), weather: Vec::new() };
        let provider =
            MemoryProvider::new().with_session(2024, 4, SessionCode::Fp1, session);
        let service = RaceAnalytics::new(provider);
        let report = service.track_evolution(2024, 4, SessionCode::Fp1).unwrap();
        assert!(!report.evolution.is_empty());
        assert!(report.message.is_none());
    }

    #[test]
    fn predict_race_answers_live_and_trims_to_topk() {
        let results = classified(&[
            ("VER", 1.0),
            ("NOR", 2.0),
            ("LEC", 3.0),
            ("PIA", 4.0),
            ("SAI", 5.0),
            ("HAM", 6.0),
        ]);
        let provider = MemoryProvider::new()
            .with_schedule(2024, vec![event(4, "Spanish Grand Prix")])
            .with_session(
                2024,
                4,
                SessionCode::R,
                SessionData { laps: Vec::new(), results, weather: Vec::new() },
            );
        let service = RaceAnalytics::new(provider);

        let full = service.predict_race(2024, 4, None).unwrap();
        let p = full.prediction().unwrap();
        assert_eq!(p.source, SourceTier::Live);
        assert_eq!(p.ranked.len(), 6);

        let trimmed = service.predict_race(2024, 4, Some(4)).unwrap();
        assert_eq!(trimmed.prediction().unwrap().ranked.len(), 4);

        // A requested top-k below three is lifted to three.
        let clamped = service.predict_race(2024, 4, Some(1)).unwrap();
        assert_eq!(clamped.prediction().unwrap().ranked.len(), 3);
    }

    struct GridModel;

    impl WinProbabilityModel for GridModel {
        fn predict_proba(&self, row: &FeatureRow) -> Result<(f64, f64)> {
            let grid = row.grid_position.unwrap_or(20.0);
            let p = 1.0 / grid.max(1.0);
            Ok((1.0 - p, p))
        }
    }

    #[test]
    fn model_predictions_require_an_attached_model() {
        let service = RaceAnalytics::new(MemoryProvider::new());
        let err = service.predict_with_model(2024, 4, None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter(_)));
    }

    #[test]
    fn model_predictions_normalize_classifier_scores() {
        let provider = MemoryProvider::new()
            .with_schedule(2024, vec![event(4, "Spanish Grand Prix")])
            .with_session(
                2024,
                4,
                SessionCode::Q,
                SessionData {
                    laps: Vec::new(),
                    results: classified(&[("NOR", 1.0), ("VER", 2.0), ("LEC", 3.0)]),
                    weather: Vec::new(),
                },
            );
        let service = RaceAnalytics::new(provider).with_model(Box::new(GridModel));
        let outcome = service.predict_with_model(2024, 4, None).unwrap();
        let p = outcome.prediction().unwrap();
        assert_eq!(p.source, SourceTier::Model);
        assert_eq!(p.event.as_deref(), Some("Spanish Grand Prix"));
        assert_eq!(p.ranked[0].driver, "NOR");
        assert!((p.probability_sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn model_predictions_without_qualifying_are_no_data() {
        let service =
            RaceAnalytics::new(MemoryProvider::new()).with_model(Box::new(GridModel));
        let outcome = service.predict_with_model(2024, 4, None).unwrap();
        assert!(outcome.is_no_data());
    }

    #[test]
    fn championship_simulation_predicts_and_projects_every_round() {
        let provider = MemoryProvider::new()
            .with_schedule(
                2030,
                vec![event(1, "Bahrain Grand Prix"), event(2, "Saudi Arabian Grand Prix")],
            )
            .with_schedule(
                2029,
                vec![event(1, "Bahrain Grand Prix"), event(2, "Saudi Arabian Grand Prix")],
            )
            .with_session(
                2029,
                1,
                SessionCode::R,
                SessionData {
                    laps: Vec::new(),
                    results: classified(&[("PIA", 1.0), ("RUS", 2.0)]),
                    weather: Vec::new(),
                },
            )
            .with_session(
                2029,
                2,
                SessionCode::R,
                SessionData {
                    laps: Vec::new(),
                    results: classified(&[("PIA", 1.0), ("RUS", 2.0)]),
                    weather: Vec::new(),
                },
            );
        let service = RaceAnalytics::new(provider);
        let result = service.simulate_championship(2030).unwrap();
        assert_eq!(result.rounds, vec![1, 2]);
        assert!(result.message.is_none());
        let sum: f64 = result
            .drivers
            .iter()
            .filter_map(|s| s.title_probability)
            .sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn championship_without_schedule_is_an_empty_projection() {
        let service = RaceAnalytics::new(MemoryProvider::new());
        let result = service.simulate_championship(2031).unwrap();
        assert!(result.rounds.is_empty());
        assert!(result.message.is_some());
        assert_eq!(result.trials, 0);
    }

    #[test]
    fn season_events_filter_testing_and_tolerate_missing_schedules() {
        let provider = MemoryProvider::new().with_schedule(
            2024,
            vec![
                ScheduledEvent { round: 0, name: "Pre-Season Testing".into(), is_testing: true },
                event(1, "Bahrain Grand Prix"),
            ],
        );
        let service = RaceAnalytics::new(provider);
        let events = service.season_events(2024).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Bahrain Grand Prix");
        assert!(service.season_events(1999).unwrap().is_empty());
    }
}
