//! # gp_core - Race Timing Analytics and Outcome Prediction Engine
//!
//! This library turns raw motorsport timing data into stint and strategy
//! analytics, ranks race and qualifying outcomes from the best available
//! data source, and projects championships with a seeded Monte Carlo.
//!
//! ## Features
//! - Lap normalization that tolerates ragged upstream exports
//! - Stint segmentation with robust pace and degradation fits
//! - Pit-effect measurement and pit-window suggestions
//! - Layered outcome prediction (live / historical / season prior / model)
//! - 100% deterministic championship simulation (same seed = same result)
//! - Read-through report caching, in memory and optionally on disk

pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod predict;
pub mod sim;
pub mod stats;
pub mod telemetry;

// Re-export the service surface
pub use api::RaceAnalytics;
pub use error::{CoreError, Result};

// Re-export configuration
pub use config::{
    AnalyticsConfig, CascadeConfig, EvolutionConfig, PaceConfig, PitConfig, SimulationConfig,
};

// Re-export the data model
pub use models::{
    ChampionshipStanding, Compound, DegradationReport, DriverStrategy, DriverTyres,
    EvolutionReport, LapRecord, NoDataNotice, OutcomeScore, PitEffectLabel, PitEvent, PitWindow,
    PredictionOutcome, RacePrediction, RawLap, SessionKind, SimulationMode, SimulationResult,
    SourceTier, Stint, StrategyReport, TyreReport,
};

// Re-export the telemetry boundary
pub use telemetry::{
    DumpProvider, MemoryProvider, ScheduledEvent, SessionCode, SessionData, SessionResult,
    TelemetryError, TelemetryProvider, WeatherSample,
};

// Re-export the model-injection seam
pub use models::FeatureRow;
pub use predict::WinProbabilityModel;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
