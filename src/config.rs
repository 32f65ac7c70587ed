use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::Difficulty;
use crate::session::machine::TestSettings;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,
    #[serde(default = "default_inactivity_timeout_secs")]
    pub inactivity_timeout_secs: u64,
    #[serde(default = "default_word_count")]
    pub word_count: usize,
    #[serde(default = "default_words_per_line")]
    pub words_per_line: usize,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_theme")]
    pub theme: String,
}

/// Upper bound for the test length and the inactivity timeout.
pub const MAX_DURATION_SECS: u32 = 3600;

fn default_duration_secs() -> u32 {
    60
}
fn default_inactivity_timeout_secs() -> u64 {
    30
}
fn default_word_count() -> usize {
    50
}
fn default_words_per_line() -> usize {
    18
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            inactivity_timeout_secs: default_inactivity_timeout_secs(),
            word_count: default_word_count(),
            words_per_line: default_words_per_line(),
            difficulty: Difficulty::default(),
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keystride")
            .join("config.toml")
    }

    /// Reset values that would make a test unplayable back to defaults and
    /// cap the timers at an hour.
    pub fn normalize(&mut self) {
        if self.duration_secs == 0 {
            self.duration_secs = default_duration_secs();
        }
        self.duration_secs = self.duration_secs.min(MAX_DURATION_SECS);
        if self.inactivity_timeout_secs == 0 {
            self.inactivity_timeout_secs = default_inactivity_timeout_secs();
        }
        self.inactivity_timeout_secs = self
            .inactivity_timeout_secs
            .min(u64::from(MAX_DURATION_SECS));
        if self.word_count == 0 {
            self.word_count = default_word_count();
        }
        if self.words_per_line == 0 {
            self.words_per_line = default_words_per_line();
        }
    }

    pub fn test_settings(&self) -> TestSettings {
        TestSettings {
            inactivity_timeout: Duration::from_secs(self.inactivity_timeout_secs),
            words_per_line: self.words_per_line,
        }
    }
}
