pub mod lap;
pub mod pit;
pub mod prediction;
pub mod report;
pub mod simulation;
pub mod stint;

pub use lap::{Compound, LapRecord, NormalizedLaps, RawLap, RowError};
pub use pit::{PitEffectLabel, PitEvent};
pub use prediction::{
    FeatureRow, NoDataNotice, OutcomeScore, PredictionOutcome, RacePrediction, SessionKind,
    SourceTier,
};
pub use report::{
    AnalysisParams, DegradationReport, DriverStrategy, DriverTyres, EvolutionPoint,
    EvolutionReport, StrategyReport, TyreReport,
};
pub use simulation::{ChampionshipStanding, SimulationMode, SimulationResult};
pub use stint::{PitWindow, Stint};
