use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::session::result::TestResult;
use crate::store::schema::{HighScore, HighScoreData, HistoryData, SCHEMA_VERSION};

const HIGH_SCORES_FILE: &str = "high_scores.json";
const HISTORY_FILE: &str = "history.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keystride");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Unreadable files and stale schemas load as empty tables.
    pub fn load_high_scores(&self) -> HighScoreData {
        let data: HighScoreData = self.load(HIGH_SCORES_FILE);
        if data.needs_reset() {
            HighScoreData::default()
        } else {
            data
        }
    }

    pub fn save_high_scores(&self, data: &HighScoreData) -> Result<()> {
        self.save(HIGH_SCORES_FILE, data)
    }

    pub fn load_history(&self) -> HistoryData {
        let data: HistoryData = self.load(HISTORY_FILE);
        if data.schema_version != SCHEMA_VERSION {
            HistoryData::default()
        } else {
            data
        }
    }

    pub fn save_history(&self, data: &HistoryData) -> Result<()> {
        self.save(HISTORY_FILE, data)
    }

    /// Append a finished test to history and file its WPM under its
    /// category. Returns the high-score rank if it placed.
    pub fn record_result(&self, result: &TestResult) -> Result<Option<usize>> {
        let mut scores = self.load_high_scores();
        let rank = scores.record(&result.category, HighScore::from(result));
        self.save_high_scores(&scores)?;

        let mut history = self.load_history();
        history.push(result.clone());
        self.save_history(&history)?;
        Ok(rank)
    }
}
