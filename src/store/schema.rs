use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::result::TestResult;

pub const SCHEMA_VERSION: u32 = 1;

/// Best scores kept per category.
pub const MAX_HIGH_SCORES: usize = 10;

/// Results kept in history.
pub const MAX_HISTORY: usize = 500;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HighScore {
    pub wpm: u32,
    pub accuracy: u32,
    pub timestamp: DateTime<Utc>,
}

impl From<&TestResult> for HighScore {
    fn from(result: &TestResult) -> Self {
        Self {
            wpm: result.wpm,
            accuracy: result.accuracy,
            timestamp: result.timestamp,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HighScoreData {
    pub schema_version: u32,
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<HighScore>>,
}

impl Default for HighScoreData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            categories: BTreeMap::new(),
        }
    }
}

impl HighScoreData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// Insert a score, keeping the category sorted by descending WPM and
    /// capped at `MAX_HIGH_SCORES`. Returns the 0-based rank if it made the
    /// table.
    pub fn record(&mut self, category: &str, score: HighScore) -> Option<usize> {
        let scores = self.categories.entry(category.to_string()).or_default();
        let rank = scores
            .iter()
            .position(|s| score.wpm > s.wpm)
            .unwrap_or(scores.len());
        if rank >= MAX_HIGH_SCORES {
            return None;
        }
        scores.insert(rank, score);
        scores.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn best(&self, category: &str) -> Option<&HighScore> {
        self.categories.get(category).and_then(|s| s.first())
    }

    pub fn scores(&self, category: &str) -> &[HighScore] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryData {
    pub schema_version: u32,
    #[serde(default)]
    pub results: Vec<TestResult>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            results: Vec::new(),
        }
    }
}

impl HistoryData {
    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
        if self.results.len() > MAX_HISTORY {
            let excess = self.results.len() - MAX_HISTORY;
            self.results.drain(..excess);
        }
    }
}
