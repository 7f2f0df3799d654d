//! Analysis configuration.
//!
//! Every tunable threshold lives here instead of being scattered as magic
//! numbers through the analysis code. Reports echo the values that produced
//! them so cached copies stay self-describing.

use serde::{Deserialize, Serialize};

use crate::models::SimulationMode;

/// Quick-lap filtering and pace estimation thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaceConfig {
    /// Laps slower than `median + outlier_threshold_s` are discarded before
    /// the quantile cut (safety-car laps, spins, in-traffic crawls).
    pub outlier_threshold_s: f64,
    /// Quantile of the remaining laps kept as "quick".
    pub quick_quantile: f64,
    /// Quick laps required before a pace estimate is reported.
    pub min_quick_laps: usize,
    /// Quick laps required before a degradation fit is reported.
    pub min_fit_laps: usize,
}

impl Default for PaceConfig {
    fn default() -> Self {
        Self {
            outlier_threshold_s: 7.0,
            quick_quantile: 0.75,
            min_quick_laps: 3,
            min_fit_laps: 5,
        }
    }
}

/// Pit-effect measurement and pit-window suggestion thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitConfig {
    /// Laps on each side of a stop compared for the pre/post delta.
    pub window_laps: u32,
    /// Pre-minus-post delta above this classifies as an undercut-style gain.
    pub undercut_threshold_s: f64,
    /// Fitted degradation slope (s/lap) at which a pit window is suggested.
    pub alert_slope: f64,
    /// Fractional position of the suggested window inside the stint span.
    pub window_band: (f64, f64),
}

impl Default for PitConfig {
    fn default() -> Self {
        Self {
            window_laps: 3,
            undercut_threshold_s: 0.15,
            alert_slope: 0.06,
            window_band: (0.55, 0.85),
        }
    }
}

/// Outcome-cascade tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeConfig {
    /// Earliest season the upstream archive covers; the historical and
    /// season-prior tiers never look further back. The historical walk
    /// treats this bound as inclusive: predicting season `min_season + 1`
    /// still inspects `min_season` itself.
    pub min_season: u16,
    /// Prior seasons the historical tier may inspect.
    pub history_window: u16,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            min_season: 2018,
            history_window: 5,
        }
    }
}

/// Championship simulation tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub mode: SimulationMode,
    /// Requested trial count for full mode; clamped to the engine cap.
    pub trials: u32,
    pub seed: u64,
    /// Simulate only rounds up to and including this one, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_to_round: Option<u32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: SimulationMode::Full,
            trials: 100,
            seed: 42,
            up_to_round: None,
        }
    }
}

/// Session-evolution index tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Global quantile cut applied before bucketing.
    pub quick_quantile: f64,
    /// Width of a time bucket, seconds of session time.
    pub bucket_s: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            quick_quantile: 0.60,
            bucket_s: 60.0,
        }
    }
}

/// Full configuration bundle carried by the analytics service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub pace: PaceConfig,
    pub pit: PitConfig,
    pub cascade: CascadeConfig,
    pub simulation: SimulationConfig,
    pub evolution: EvolutionConfig,
}
