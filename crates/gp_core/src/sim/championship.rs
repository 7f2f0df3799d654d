//! Championship projection over per-round outcome tables.
//!
//! Full mode runs a Monte Carlo: every trial samples a finishing order for
//! each round, awards points, and crowns the driver and team champions.
//! Fast mode skips the sampling and accumulates probability-weighted points
//! in a single deterministic pass.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::models::{ChampionshipStanding, RacePrediction, SimulationMode, SimulationResult};

use super::sampler;

/// Points awarded to the top ten classified finishers.
pub const POINTS_TOP10: [f64; 10] = [25.0, 18.0, 15.0, 12.0, 10.0, 8.0, 6.0, 4.0, 2.0, 1.0];

/// Hard cap on full-mode trials.
pub const MAX_TRIALS: u32 = 200;

/// Points for a finishing rank, winner = rank 0.
pub fn points_for_rank(rank: usize) -> f64 {
    POINTS_TOP10.get(rank).copied().unwrap_or(0.0)
}

/// Projects a championship from one prediction table per round.
///
/// Tables arrive in round order; rounds the cascade could not rank are
/// expected to be filtered out by the caller. Trials are seeded from
/// `config.seed`, so equal inputs always produce equal projections.
pub fn project(
    season: u16,
    predictions: &[RacePrediction],
    config: &SimulationConfig,
) -> SimulationResult {
    let plan = build_plan(predictions);
    if plan.tables.is_empty() {
        return SimulationResult {
            season,
            mode: config.mode,
            trials: 0,
            rounds: Vec::new(),
            drivers: Vec::new(),
            teams: Vec::new(),
            message: Some("no rankable rounds to simulate".into()),
        };
    }
    match config.mode {
        SimulationMode::Full => run_full(season, &plan, config),
        SimulationMode::Fast => run_fast(season, &plan),
    }
}

// ============================================================================
// Simulation plan
// ============================================================================

/// Team name used when a prediction row carries none.
const UNKNOWN_TEAM: &str = "UNKNOWN";

/// Prediction tables resolved against a shared driver/team universe, built
/// once and shared by every trial.
struct SimPlan {
    rounds: Vec<u32>,
    /// First-appearance order; doubles as the champion tie-break.
    drivers: Vec<String>,
    teams: Vec<String>,
    tables: Vec<PlanTable>,
}

struct PlanTable {
    weights: Vec<f64>,
    driver_ids: Vec<usize>,
    team_ids: Vec<usize>,
}

fn build_plan(predictions: &[RacePrediction]) -> SimPlan {
    let mut drivers: Vec<String> = Vec::new();
    let mut teams: Vec<String> = Vec::new();
    let mut rounds = Vec::with_capacity(predictions.len());
    let mut tables = Vec::with_capacity(predictions.len());
    for prediction in predictions {
        let mut weights = Vec::with_capacity(prediction.ranked.len());
        let mut driver_ids = Vec::with_capacity(prediction.ranked.len());
        let mut team_ids = Vec::with_capacity(prediction.ranked.len());
        for score in &prediction.ranked {
            weights.push(score.p_win);
            driver_ids.push(intern(&mut drivers, &score.driver));
            team_ids.push(intern(
                &mut teams,
                score.team.as_deref().unwrap_or(UNKNOWN_TEAM),
            ));
        }
        rounds.push(prediction.round);
        tables.push(PlanTable { weights, driver_ids, team_ids });
    }
    SimPlan { rounds, drivers, teams, tables }
}

fn intern(pool: &mut Vec<String>, name: &str) -> usize {
    match pool.iter().position(|n| n == name) {
        Some(i) => i,
        None => {
            pool.push(name.to_string());
            pool.len() - 1
        }
    }
}

// ============================================================================
// Full mode: Monte Carlo
// ============================================================================

fn run_full(season: u16, plan: &SimPlan, config: &SimulationConfig) -> SimulationResult {
    let trials = config.trials.min(MAX_TRIALS).max(1);
    log::info!(
        "simulating season {}: {} rounds, {} trials (full mode)",
        season,
        plan.rounds.len(),
        trials
    );
    let champions: Vec<(Option<usize>, Option<usize>)> = (0..trials)
        .into_par_iter()
        .map(|trial| {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(u64::from(trial)));
            run_trial(plan, &mut rng)
        })
        .collect();

    let mut driver_wins = vec![0u32; plan.drivers.len()];
    let mut team_wins = vec![0u32; plan.teams.len()];
    for (driver, team) in champions {
        if let Some(d) = driver {
            driver_wins[d] += 1;
        }
        if let Some(t) = team {
            team_wins[t] += 1;
        }
    }
    SimulationResult {
        season,
        mode: SimulationMode::Full,
        trials,
        rounds: plan.rounds.clone(),
        drivers: standings_from_wins(&plan.drivers, &driver_wins, trials),
        teams: standings_from_wins(&plan.teams, &team_wins, trials),
        message: None,
    }
}

/// Plays out one season: sample every round, award points, crown champions.
fn run_trial(plan: &SimPlan, rng: &mut ChaCha8Rng) -> (Option<usize>, Option<usize>) {
    let mut driver_points = vec![0.0f64; plan.drivers.len()];
    let mut team_points = vec![0.0f64; plan.teams.len()];
    for table in &plan.tables {
        let order = sampler::sample_ranking(rng, &table.weights);
        for (rank, &row) in order.iter().enumerate() {
            let pts = points_for_rank(rank);
            if pts == 0.0 {
                break;
            }
            driver_points[table.driver_ids[row]] += pts;
            team_points[table.team_ids[row]] += pts;
        }
    }
    (argmax_first(&driver_points), argmax_first(&team_points))
}

/// Index of the maximum, ties going to the earliest entry.
fn argmax_first(points: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &p) in points.iter().enumerate() {
        let beats = match best {
            Some((_, bp)) => p > bp,
            None => true,
        };
        if beats {
            best = Some((i, p));
        }
    }
    best.map(|(i, _)| i)
}

fn standings_from_wins(names: &[String], wins: &[u32], trials: u32) -> Vec<ChampionshipStanding> {
    let mut out: Vec<ChampionshipStanding> = names
        .iter()
        .zip(wins)
        .map(|(name, w)| ChampionshipStanding {
            name: name.clone(),
            title_probability: Some(f64::from(*w) / f64::from(trials)),
            expected_points: None,
        })
        .collect();
    out.sort_by(|a, b| {
        b.title_probability
            .partial_cmp(&a.title_probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out
}

// ============================================================================
// Fast mode: expected points
// ============================================================================

fn run_fast(season: u16, plan: &SimPlan) -> SimulationResult {
    log::debug!(
        "simulating season {}: {} rounds (fast mode)",
        season,
        plan.rounds.len()
    );
    let mut driver_points = vec![0.0f64; plan.drivers.len()];
    let mut team_points = vec![0.0f64; plan.teams.len()];
    for table in &plan.tables {
        // Rows arrive sorted by win probability; the row's rank decides
        // which points slot its probability weights.
        for row in 0..table.weights.len() {
            let pts = points_for_rank(row);
            if pts == 0.0 {
                break;
            }
            let expected = pts * table.weights[row];
            driver_points[table.driver_ids[row]] += expected;
            team_points[table.team_ids[row]] += expected;
        }
    }
    SimulationResult {
        season,
        mode: SimulationMode::Fast,
        trials: 0,
        rounds: plan.rounds.clone(),
        drivers: standings_from_points(&plan.drivers, &driver_points),
        teams: standings_from_points(&plan.teams, &team_points),
        message: None,
    }
}

fn standings_from_points(names: &[String], points: &[f64]) -> Vec<ChampionshipStanding> {
    let mut out: Vec<ChampionshipStanding> = names
        .iter()
        .zip(points)
        .map(|(name, p)| ChampionshipStanding {
            name: name.clone(),
            title_probability: None,
            expected_points: Some(*p),
        })
        .collect();
    out.sort_by(|a, b| {
        b.expected_points
            .partial_cmp(&a.expected_points)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out
}
