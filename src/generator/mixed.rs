use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rust_embed::Embed;

use crate::generator::{Difficulty, WordList, WordSource, WordSourceError};

#[derive(Embed)]
#[folder = "assets/words/"]
struct WordAssets;

const COMMON_WORDS: &str = "common.txt";
const PROGRAMMING_WORDS: &str = "programming.txt";

fn load_asset(name: &'static str) -> Result<Vec<String>, WordSourceError> {
    let file = WordAssets::get(name).ok_or(WordSourceError::MissingAsset(name))?;
    let words: Vec<String> = String::from_utf8_lossy(file.data.as_ref())
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if words.is_empty() {
        return Err(WordSourceError::MissingAsset(name));
    }
    Ok(words)
}

/// Pick `word_count` words, `floor(word_count * ratio)` of them programming
/// terms and the rest common words, then shuffle the whole list.
pub fn generate_mixed<R: Rng + ?Sized>(
    rng: &mut R,
    common: &[String],
    programming: &[String],
    word_count: usize,
    programming_ratio: f64,
) -> Vec<String> {
    let programming_count = (word_count as f64 * programming_ratio.clamp(0.0, 1.0)).floor() as usize;
    let common_count = word_count - programming_count;

    let mut words: Vec<String> = Vec::with_capacity(word_count);
    for _ in 0..common_count {
        if let Some(w) = common.choose(rng) {
            words.push(w.clone());
        }
    }
    for _ in 0..programming_count {
        if let Some(w) = programming.choose(rng) {
            words.push(w.clone());
        }
    }
    words.shuffle(rng);
    words
}

/// Generated word lists drawn from the bundled corpora.
pub struct MixedWords {
    common: Vec<String>,
    programming: Vec<String>,
    word_count: usize,
    difficulty: Difficulty,
    rng: SmallRng,
}

impl MixedWords {
    pub fn new(word_count: usize, difficulty: Difficulty) -> Result<Self, WordSourceError> {
        Self::with_rng(word_count, difficulty, SmallRng::from_entropy())
    }

    pub fn with_rng(
        word_count: usize,
        difficulty: Difficulty,
        rng: SmallRng,
    ) -> Result<Self, WordSourceError> {
        Ok(Self {
            common: load_asset(COMMON_WORDS)?,
            programming: load_asset(PROGRAMMING_WORDS)?,
            word_count,
            difficulty,
            rng,
        })
    }
}

impl WordSource for MixedWords {
    fn next_words(&mut self) -> Result<WordList, WordSourceError> {
        let words = generate_mixed(
            &mut self.rng,
            &self.common,
            &self.programming,
            self.word_count,
            self.difficulty.programming_ratio(),
        );
        WordList::new(words)
    }

    fn category(&self) -> String {
        self.difficulty.as_str().to_string()
    }
}
