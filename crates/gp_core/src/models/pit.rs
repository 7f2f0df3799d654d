//! Pit-stop effect data model.

use serde::{Deserialize, Serialize};

/// Classification of a single pit stop's measured effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitEffectLabel {
    /// Post-stop pace beat pre-stop pace by more than the threshold.
    UndercutLike,
    Neutral,
    /// One of the comparison windows held no clean laps.
    InsufficientData,
}

impl PitEffectLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PitEffectLabel::UndercutLike => "undercut_like",
            PitEffectLabel::Neutral => "neutral",
            PitEffectLabel::InsufficientData => "insufficient_data",
        }
    }
}

/// Measured pace effect around one pit stop.
///
/// `delta_s` is pre-stop pace minus post-stop pace: positive means the car
/// was faster after the stop (fresh-tyre gain), the sign convention every
/// consumer depends on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitEvent {
    pub driver: String,
    /// Lap on which the car entered the pit lane.
    pub lap: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_pace_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_pace_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_s: Option<f64>,
    pub label: PitEffectLabel,
}
