//! In-memory telemetry provider.
//!
//! Holds pre-loaded sessions and schedules; anything not loaded answers
//! `NotAvailable`, which makes it the natural double for cascade tests and
//! for embedding the engine against already-fetched data.

use std::collections::HashMap;

use super::{
    ScheduledEvent, SessionCode, SessionData, TelemetryError, TelemetryProvider,
};

#[derive(Debug, Default)]
pub struct MemoryProvider {
    sessions: HashMap<(u16, u32, SessionCode), SessionData>,
    schedules: HashMap<u16, Vec<ScheduledEvent>>,
    /// Keys that simulate a broken upstream rather than missing data.
    failures: HashMap<(u16, u32, SessionCode), String>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(
        mut self,
        season: u16,
        round: u32,
        code: SessionCode,
        data: SessionData,
    ) -> Self {
        self.sessions.insert((season, round, code), data);
        self
    }

    pub fn with_schedule(mut self, season: u16, events: Vec<ScheduledEvent>) -> Self {
        self.schedules.insert(season, events);
        self
    }

    /// Makes one session key answer with a hard provider failure.
    pub fn with_failure(
        mut self,
        season: u16,
        round: u32,
        code: SessionCode,
        message: impl Into<String>,
    ) -> Self {
        self.failures.insert((season, round, code), message.into());
        self
    }
}

impl TelemetryProvider for MemoryProvider {
    fn session(
        &self,
        season: u16,
        round: u32,
        code: SessionCode,
    ) -> Result<SessionData, TelemetryError> {
        if let Some(message) = self.failures.get(&(season, round, code)) {
            return Err(TelemetryError::failure(message.clone()));
        }
        self.sessions
            .get(&(season, round, code))
            .cloned()
            .ok_or_else(|| {
                TelemetryError::not_available(format!(
                    "no session loaded for {} round {} {}",
                    season, round, code
                ))
            })
    }

    fn schedule(&self, season: u16) -> Result<Vec<ScheduledEvent>, TelemetryError> {
        self.schedules.get(&season).cloned().ok_or_else(|| {
            TelemetryError::not_available(format!("no schedule loaded for {}", season))
        })
    }
}
