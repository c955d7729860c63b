//! Score sink and local leaderboard
//!
//! The game core hands the final score to a [`ScoreSink`] exactly once per
//! run. [`HighScores`] is the local fallback: top 10 kept in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::{Result, storage};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Receiver for finished runs
pub trait ScoreSink {
    /// Called once, on the tick the last life is lost
    fn on_game_over(&mut self, final_score: u64);

    /// Best score known to the sink, for the menu
    fn best(&self) -> Option<u64>;
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    const STORAGE_KEY: &'static str = "gorbage_truck_highscores";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry { score, timestamp };

        // Sorted descending; ties keep the older entry first
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Stored leaderboard, or an empty one
    pub fn load() -> Self {
        let Some(json) = storage::read(Self::STORAGE_KEY) else {
            log::info!("No high scores found, starting fresh");
            return Self::new();
        };
        match Self::from_json(&json) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::warn!("Discarding stored high scores: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self) {
        match self.to_json() {
            Ok(json) => {
                if storage::write(Self::STORAGE_KEY, &json) {
                    log::info!("High scores saved ({} entries)", self.entries.len());
                }
            }
            Err(e) => log::warn!("High scores not saved: {}", e),
        }
    }
}

impl ScoreSink for HighScores {
    fn on_game_over(&mut self, final_score: u64) {
        if let Some(rank) = self.add_score(final_score, now_ms()) {
            log::info!("New high score #{}: {}", rank, final_score);
            self.save();
        }
    }

    fn best(&self) -> Option<u64> {
        self.top_score()
    }
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let mut hs = HighScores::new();
        assert_eq!(hs.add_score(0, 0.0), None);
        assert!(hs.is_empty());
    }

    #[test]
    fn test_sorted_best_first() {
        let mut hs = HighScores::new();
        hs.add_score(100, 1.0);
        assert_eq!(hs.add_score(300, 2.0), Some(1));
        assert_eq!(hs.add_score(200, 3.0), Some(2));
        let scores: Vec<_> = hs.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
        assert_eq!(hs.best(), Some(300));
    }

    #[test]
    fn test_keeps_top_ten() {
        let mut hs = HighScores::new();
        for s in 1..=10 {
            hs.add_score(s * 10, 0.0);
        }
        assert!(!hs.qualifies(5));
        assert_eq!(hs.add_score(55, 0.0), Some(6));
        assert_eq!(hs.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(hs.entries.last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_sink_records_run() {
        let mut hs = HighScores::new();
        hs.on_game_over(4200);
        assert_eq!(hs.best(), Some(4200));
    }

    #[test]
    fn test_from_json_sorts_and_trims() {
        let json = r#"{"entries":[{"score":5,"timestamp":0},{"score":9,"timestamp":0}]}"#;
        let hs = HighScores::from_json(json).unwrap();
        assert_eq!(hs.top_score(), Some(9));
        assert!(HighScores::from_json("[").is_err());
    }
}
