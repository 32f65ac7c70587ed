pub mod mixed;
pub mod passage;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WordSourceError {
    #[error("no words to type")]
    Empty,
    #[error("please select at least {min} words (found {found})")]
    TooFewWords { found: usize, min: usize },
    #[error("please select at most {max} words (found {found})")]
    TooManyWords { found: usize, max: usize },
    #[error("word list asset {0} is missing")]
    MissingAsset(&'static str),
}

/// Ordered, non-empty list of target words for one test.
///
/// Every word is non-empty and free of whitespace, so a space keystroke can
/// only ever mean "next word".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordList(Vec<String>);

impl WordList {
    pub fn new<I, S>(words: I) -> Result<Self, WordSourceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .flat_map(|w| {
                w.as_ref()
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        if words.is_empty() {
            return Err(WordSourceError::Empty);
        }
        Ok(Self(words))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

/// Supplies the words for the next test.
pub trait WordSource {
    fn next_words(&mut self) -> Result<WordList, WordSourceError>;

    /// High-score category results from this source are filed under.
    fn category(&self) -> String;
}

/// Generated-list difficulty, used as the high-score category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Share of programming terms mixed into the common-word list.
    pub fn programming_ratio(self) -> f64 {
        match self {
            Difficulty::Easy => 0.0,
            Difficulty::Medium => 0.3,
            Difficulty::Hard => 0.6,
        }
    }
}
