//! Outcome prediction.
//!
//! The cascade ([`OutcomeCascade`]) ranks an event's field from the best
//! data source that can speak for it; [`strength`] and [`history`] supply
//! the per-tier scoring, [`features`] and [`WinProbabilityModel`] support
//! the optional externally-trained classifier path.

pub mod cascade;
pub mod features;
pub mod history;
pub mod model;
pub mod strength;

pub use cascade::OutcomeCascade;
pub use model::WinProbabilityModel;
pub use strength::{SeasonStrength, StrengthBasis, StrengthEntry};
