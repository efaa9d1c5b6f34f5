//! High score ledger
//!
//! A single best score, persisted under one key of a `KeyValueStore`
//! (LocalStorage on the web, a JSON file on native).

use crate::persistence::KeyValueStore;

/// Storage key, shared with the earlier browser build so existing scores carry over
pub const HIGH_SCORE_KEY: &str = "catchBallHighScore";

/// Running high score backed by a key-value store
#[derive(Debug, Clone)]
pub struct HighScoreLedger<S> {
    store: S,
    best: u64,
}

impl<S: KeyValueStore> HighScoreLedger<S> {
    /// Create a ledger without reading the store
    pub fn new(store: S) -> Self {
        Self { store, best: 0 }
    }

    /// Create a ledger and load the stored high score
    pub fn open(store: S) -> Self {
        let mut ledger = Self::new(store);
        ledger.load();
        ledger
    }

    /// Read the stored high score (0 if absent or unreadable)
    pub fn load(&mut self) -> u64 {
        self.best = match self.store.get(HIGH_SCORE_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(score) => {
                    log::info!("Loaded high score {}", score);
                    score
                }
                Err(_) => {
                    log::warn!("Ignoring malformed high score {:?}", raw);
                    0
                }
            },
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("High score unavailable: {}", e);
                0
            }
        };
        self.best
    }

    /// Record `score` if it beats the current best.
    ///
    /// Returns true only when the best was raised and persisted. A failed write
    /// still raises the in-memory best so the session keeps showing it.
    pub fn record_if_higher(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        match self.store.set(HIGH_SCORE_KEY, &score.to_string()) {
            Ok(()) => {
                log::debug!("High score saved ({})", score);
                true
            }
            Err(e) => {
                log::warn!("Failed to save high score {}: {}", score, e);
                false
            }
        }
    }

    /// Current best score
    pub fn best(&self) -> u64 {
        self.best
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
