//! Outcome prediction data model.
//!
//! A prediction is either a ranked probability table tagged with the tier
//! that produced it, or a structured no-data notice when every tier of the
//! cascade came up empty. The notice is a success value: "nothing is known
//! about this event yet" is an answer, not an error.

use serde::{Deserialize, Serialize};

use crate::telemetry::SessionCode;

/// What is being predicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Race,
    Qualifying,
}

impl SessionKind {
    /// The session the cascade's live tier reads for this prediction.
    pub fn session_code(&self) -> SessionCode {
        match self {
            SessionKind::Race => SessionCode::R,
            SessionKind::Qualifying => SessionCode::Q,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Race => "race",
            SessionKind::Qualifying => "qualifying",
        }
    }
}

/// Which tier of the cascade answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTier {
    /// Classified results of the session itself.
    Live,
    /// Finishing orders of the same-named event in prior seasons.
    HistoricalEvent,
    /// Prior-season championship form.
    SeasonPrior,
    /// External classifier over pre-race features.
    Model,
}

impl SourceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTier::Live => "live",
            SourceTier::HistoricalEvent => "historical_event",
            SourceTier::SeasonPrior => "season_prior",
            SourceTier::Model => "model",
        }
    }
}

/// One driver's outcome probabilities.
///
/// For qualifying predictions `p_win` is the pole probability. In the
/// softmax tiers (live, season prior, model) `p_top3` mirrors the driver's
/// own probability mass; only the historical tier produces a frequency-based
/// top-3 rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeScore {
    pub driver: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    pub p_win: f64,
    pub p_top3: f64,
}

/// A ranked outcome table for one event.
///
/// `ranked` is sorted by descending probability. Unless the caller asked
/// for a top-k view, it covers the full candidate set and `p_win` sums to
/// 1.0 (± numeric noise) regardless of the tier that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RacePrediction {
    pub season: u16,
    pub round: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    pub kind: SessionKind,
    pub source: SourceTier,
    pub ranked: Vec<OutcomeScore>,
    /// Prior seasons that contributed (historical tier only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasons_used: Option<u32>,
}

impl RacePrediction {
    /// Sum of win probability over the candidate set. 1.0 ± ε by
    /// construction; exposed for assertions and sanity logging.
    pub fn probability_sum(&self) -> f64 {
        self.ranked.iter().map(|s| s.p_win).sum()
    }

    /// The predicted winner (pole sitter for qualifying), if any driver
    /// made it into the table.
    pub fn winner(&self) -> Option<&OutcomeScore> {
        self.ranked.first()
    }
}

/// Terminal cascade outcome: no tier could say anything about the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoDataNotice {
    pub season: u16,
    pub round: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    pub message: String,
}

/// What a prediction request returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionOutcome {
    Ranked(RacePrediction),
    NoData(NoDataNotice),
}

impl PredictionOutcome {
    pub fn prediction(&self) -> Option<&RacePrediction> {
        match self {
            PredictionOutcome::Ranked(p) => Some(p),
            PredictionOutcome::NoData(_) => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, PredictionOutcome::NoData(_))
    }
}

/// Pre-race feature vector handed to an external win-probability model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRow {
    pub season: u16,
    pub round: u32,
    pub driver: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_position: Option<f64>,
    /// Best qualifying lap, seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quali_best_s: Option<f64>,
}
