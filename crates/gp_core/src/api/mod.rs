//! Public service surface.

pub mod service;

pub use service::RaceAnalytics;
