//! Championship simulation.

pub mod championship;
pub mod sampler;

pub use championship::{points_for_rank, project, MAX_TRIALS, POINTS_TOP10};
