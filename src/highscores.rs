//! High score leaderboard
//!
//! One entry per identity holding that player's best score, top 10 kept.
//! Persisted to LocalStorage on the web.

use serde::{Deserialize, Serialize};

use crate::persistence::{Identity, Leaderboard, LeaderboardEntry, StoreError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// High score leaderboard, sorted by score descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<LeaderboardEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "fruit_slash_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// 1-indexed rank of an identity, if present
    pub fn rank_of(&self, identity: u64) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.identity == identity)
            .map(|i| i + 1)
    }

    /// Record a score for an identity.
    ///
    /// Returns the new rank when the player's stored best improved.
    pub fn record(&mut self, identity: &Identity, score: u64) -> Option<usize> {
        if let Some(i) = self.entries.iter().position(|e| e.identity == identity.id) {
            if score <= self.entries[i].score {
                return None;
            }
            self.entries.remove(i);
        } else if !self.qualifies(score) {
            return None;
        }

        let entry = LeaderboardEntry {
            identity: identity.id,
            display_name: identity.label(),
            score,
        };

        // Ties keep the earlier holder ahead
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        self.rank_of(identity.id)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)?;

        let json = serde_json::to_string(self)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| StoreError::WriteFailed {
                key: Self::STORAGE_KEY,
                reason: format!("{e:?}"),
            })?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl Leaderboard for HighScores {
    fn submit_score(&mut self, identity: &Identity, score: u64) -> Result<bool, StoreError> {
        match self.record(identity, score) {
            Some(rank) => {
                log::info!("{} placed #{rank} with {score}", identity.label());
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn fetch_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        Ok(self.entries.iter().take(limit).cloned().collect())
    }
}
