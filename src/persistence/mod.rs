//! Collaborator contracts for scores
//!
//! The engine only talks to these traits. Calls are fire-and-forget from
//! its side: failures are logged and never touch run state.

mod error;

pub use error::StoreError;

use serde::{Deserialize, Serialize};

/// Authenticated player, treated as an opaque label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: u64,
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            display_name: None,
        }
    }

    pub fn with_name(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: Some(name.into()),
        }
    }

    /// Display name, or `user:<id>` when none was supplied
    pub fn label(&self) -> String {
        match &self.display_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("user:{}", self.id),
        }
    }
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub identity: u64,
    pub display_name: String,
    pub score: u64,
}

/// Best-score persistence
pub trait ScoreStore {
    /// Best known score, 0 when nothing is stored
    fn read_best_score(&self) -> u64;
    fn write_best_score(&mut self, score: u64) -> Result<(), StoreError>;
}

/// Ranked score board
pub trait Leaderboard {
    /// Returns true if the submission was accepted as a new best
    fn submit_score(&mut self, identity: &Identity, score: u64) -> Result<bool, StoreError>;
    /// Top `limit` entries, highest score first
    fn fetch_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError>;
}

/// Best score in LocalStorage on the web, in memory natively
#[derive(Debug, Default)]
pub struct LocalScoreStore {
    #[cfg(not(target_arch = "wasm32"))]
    best: u64,
}

impl LocalScoreStore {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "fruit_slash_best_score";

    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(StoreError::Unavailable)
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalScoreStore {
    fn read_best_score(&self) -> u64 {
        let Ok(storage) = local_storage() else {
            return 0;
        };
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable best score: {e}");
                0
            }),
            _ => 0,
        }
    }

    fn write_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        let storage = local_storage()?;
        let json = serde_json::to_string(&score)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| StoreError::WriteFailed {
                key: Self::STORAGE_KEY,
                reason: format!("{e:?}"),
            })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for LocalScoreStore {
    fn read_best_score(&self) -> u64 {
        self.best
    }

    fn write_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.best = score;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_label_fallback() {
        assert_eq!(Identity::new(42).label(), "user:42");
        assert_eq!(Identity::with_name(42, "  ").label(), "user:42");
        assert_eq!(Identity::with_name(7, "kiwi").label(), "kiwi");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_local_store_round_trip() {
        let mut store = LocalScoreStore::new();
        assert_eq!(store.read_best_score(), 0);
        store.write_best_score(120).unwrap();
        assert_eq!(store.read_best_score(), 120);
    }
}
