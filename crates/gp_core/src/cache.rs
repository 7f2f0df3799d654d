//! Two-level report cache.
//!
//! Every report type gets its own cache: a process-memory map in front of
//! an optional directory of pretty-printed JSON files. Reports built from
//! missing telemetry are marked [`Computed::Transient`] and served without
//! being stored, so they are recomputed once the data shows up instead of
//! pinning an empty answer forever.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::telemetry::SessionCode;

/// One report per (season, round, session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportKey {
    pub season: u16,
    pub round: u32,
    pub session: SessionCode,
}

/// Whether a freshly computed report may be stored.
pub enum Computed<T> {
    /// Real data behind it: store and serve.
    Cacheable(T),
    /// Built without data: serve this once, never store it.
    Transient(T),
}

pub struct ReportCache<T> {
    prefix: &'static str,
    dir: Option<PathBuf>,
    mem: Mutex<HashMap<ReportKey, T>>,
}

impl<T: Clone + Serialize + DeserializeOwned> ReportCache<T> {
    pub fn new(prefix: &'static str) -> Self {
        Self::with_dir(prefix, None)
    }

    pub fn with_dir(prefix: &'static str, dir: Option<PathBuf>) -> Self {
        Self {
            prefix,
            dir,
            mem: Mutex::new(HashMap::new()),
        }
    }

    /// Serves the cached report or computes it. The closure runs with no
    /// lock held; a computation error propagates uncached.
    pub fn get_or_compute<F>(&self, key: ReportKey, compute: F) -> Result<T>
    where
        F: FnOnce() -> Result<Computed<T>>,
    {
        if let Some(hit) = self.lock_mem().get(&key) {
            return Ok(hit.clone());
        }
        if let Some(stored) = self.read_disk(&key) {
            self.lock_mem().insert(key, stored.clone());
            return Ok(stored);
        }
        match compute()? {
            Computed::Cacheable(value) => {
                self.write_disk(&key, &value);
                self.lock_mem().insert(key, value.clone());
                Ok(value)
            }
            Computed::Transient(value) => Ok(value),
        }
    }

    /// Drops the in-memory layer. Files on disk stay.
    pub fn clear(&self) {
        self.lock_mem().clear();
    }

    fn path_for(&self, key: &ReportKey) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| {
            dir.join(format!(
                "{}_{}_{}_{}.json",
                self.prefix, key.season, key.round, key.session
            ))
        })
    }

    fn read_disk(&self, key: &ReportKey) -> Option<T> {
        let path = self.path_for(key)?;
        let bytes = fs::read(&path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("discarding corrupt cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Disk persistence never fails a report; problems are logged and the
    /// value is served from memory anyway.
    fn write_disk(&self, key: &ReportKey, value: &T) {
        let path = match self.path_for(key) {
            Some(p) => p,
            None => return,
        };
        let json = match serde_json::to_vec_pretty(value) {
            Ok(j) => j,
            Err(e) => {
                log::warn!("could not serialize cache entry {}: {}", path.display(), e);
                return;
            }
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("could not create cache dir {}: {}", parent.display(), e);
                return;
            }
        }
        if let Err(e) = fs::write(&path, json) {
            log::warn!("could not persist cache file {}: {}", path.display(), e);
        }
    }

    fn lock_mem(&self) -> MutexGuard<'_, HashMap<ReportKey, T>> {
        match self.mem.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
