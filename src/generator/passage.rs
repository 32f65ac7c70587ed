use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::generator::{WordList, WordSource, WordSourceError};

pub const MIN_PASSAGE_WORDS: usize = 5;
pub const MAX_PASSAGE_WORDS: usize = 50;

/// A user-chosen passage, typed as-is on every test.
#[derive(Clone, Debug)]
pub struct PassageSource {
    words: WordList,
}

impl PassageSource {
    pub fn from_text(text: &str) -> Result<Self, WordSourceError> {
        let found = text.split_whitespace().count();
        if found < MIN_PASSAGE_WORDS {
            return Err(WordSourceError::TooFewWords {
                found,
                min: MIN_PASSAGE_WORDS,
            });
        }
        if found > MAX_PASSAGE_WORDS {
            return Err(WordSourceError::TooManyWords {
                found,
                max: MAX_PASSAGE_WORDS,
            });
        }
        Ok(Self {
            words: WordList::new(text.split_whitespace())?,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read passage {}", path.display()))?;
        Ok(Self::from_text(&text)?)
    }
}

impl WordSource for PassageSource {
    fn next_words(&mut self) -> Result<WordList, WordSourceError> {
        Ok(self.words.clone())
    }

    fn category(&self) -> String {
        "passage".to_string()
    }
}
