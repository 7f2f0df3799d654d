//! Lap analytics pipeline.
//!
//! Data flows one way: raw rows are validated once
//! ([`normalize::normalize_laps`]), segmented into stints
//! ([`segment::segment_stints`]), and the per-stint analytics
//! ([`pace`], [`degradation`], [`pit_effect`], [`evolution`]) only ever see
//! canonical laps. [`strategy`] stitches the per-driver picture together.

pub mod degradation;
pub mod evolution;
pub mod normalize;
pub mod pace;
pub mod pit_effect;
pub mod segment;
pub mod strategy;
