//! Telemetry provider over local JSON session dumps.
//!
//! Serves sessions from a flat directory of files written by whatever
//! fetch tooling sits outside this crate:
//!
//! ```text
//! <dir>/session_<season>_<round>_<code>.json   -> SessionData
//! <dir>/schedule_<season>.json                 -> Vec<ScheduledEvent>
//! ```
//!
//! A missing file is `NotAvailable` (the dump was never fetched, same as
//! unpublished data); an unreadable or unparsable file is a `Failure`.

use std::path::{Path, PathBuf};

use super::{
    ScheduledEvent, SessionCode, SessionData, TelemetryError, TelemetryProvider,
};

#[derive(Debug, Clone)]
pub struct DumpProvider {
    dir: PathBuf,
}

impl DumpProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn session_path(&self, season: u16, round: u32, code: SessionCode) -> PathBuf {
        self.dir
            .join(format!("session_{}_{}_{}.json", season, round, code.as_str()))
    }

    pub fn schedule_path(&self, season: u16) -> PathBuf {
        self.dir.join(format!("schedule_{}.json", season))
    }

    fn read_json<T: serde::de::DeserializeOwned>(
        path: &Path,
        what: &str,
    ) -> Result<T, TelemetryError> {
        if !path.exists() {
            return Err(TelemetryError::not_available(format!(
                "no {} dump at {}",
                what,
                path.display()
            )));
        }
        let bytes = std::fs::read(path).map_err(|e| {
            TelemetryError::failure(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            TelemetryError::failure(format!("corrupt {} dump {}: {}", what, path.display(), e))
        })
    }
}

impl TelemetryProvider for DumpProvider {
    fn session(
        &self,
        season: u16,
        round: u32,
        code: SessionCode,
    ) -> Result<SessionData, TelemetryError> {
        Self::read_json(&self.session_path(season, round, code), "session")
    }

    fn schedule(&self, season: u16) -> Result<Vec<ScheduledEvent>, TelemetryError> {
        Self::read_json(&self.schedule_path(season), "schedule")
    }
}
