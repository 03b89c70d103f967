//! Best-score persistence
//!
//! A single numeric record. Unreadable or malformed data loads as zero; the
//! game never refuses to start over a bad save.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Storage key shared by every backend
pub const BEST_SCORE_KEY: &str = "skyleap_best";

/// Get/set of the persisted best score
pub trait BestScoreStore {
    /// Stored best, or 0 when absent or unreadable
    fn load(&self) -> u64;

    fn save(&mut self, score: u64) -> Result<()>;
}

/// On-disk record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRecord {
    pub best_score: u64,
}

/// Parse stored text: a JSON record, or a bare number. Anything else is 0.
pub fn parse_best(text: &str) -> u64 {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }
    if let Ok(record) = serde_json::from_str::<BestRecord>(text) {
        return record.best_score;
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value.floor() as u64,
        _ => {
            log::warn!("Ignoring malformed best score {text:?}");
            0
        }
    }
}

/// In-memory store (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub best: u64,
    /// Number of successful writes
    pub writes: usize,
}

impl MemoryStore {
    pub fn with_best(best: u64) -> Self {
        Self { best, writes: 0 }
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> u64 {
        self.best
    }

    fn save(&mut self, score: u64) -> Result<()> {
        self.best = score;
        self.writes += 1;
        Ok(())
    }
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl BestScoreStore for FileStore {
    fn load(&self) -> u64 {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => parse_best(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => {
                log::warn!("Could not read best score from {}: {e}", self.path.display());
                0
            }
        }
    }

    fn save(&mut self, score: u64) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string(&BestRecord { best_score: score })?;
        // Write then rename so a crash never leaves a torn file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("Best score {score} saved to {}", self.path.display());
        Ok(())
    }
}

/// Browser LocalStorage, stored as a bare number
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl BestScoreStore for LocalStorageStore {
    fn load(&self) -> u64 {
        Self::storage()
            .and_then(|s| s.get_item(BEST_SCORE_KEY).ok().flatten())
            .map(|text| parse_best(&text))
            .unwrap_or(0)
    }

    fn save(&mut self, score: u64) -> Result<()> {
        let storage = Self::storage()
            .ok_or_else(|| crate::Error::StorageUnavailable("no localStorage".into()))?;
        storage
            .set_item(BEST_SCORE_KEY, &score.to_string())
            .map_err(|e| crate::Error::StorageUnavailable(format!("{e:?}")))?;
        log::info!("Best score {score} saved");
        Ok(())
    }
}
