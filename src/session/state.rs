use std::time::{Duration, Instant};

use crate::engine::metrics;
use crate::generator::WordList;

/// Why a test stopped accepting input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The countdown reached zero.
    TimeUp,
    /// No input arrived within the inactivity threshold.
    Inactivity,
    /// The last word was completed.
    WordsExhausted,
    /// Ended on request.
    Ended,
}

impl EndReason {
    pub fn describe(self) -> &'static str {
        match self {
            EndReason::TimeUp => "time's up",
            EndReason::Inactivity => "ended for inactivity",
            EndReason::WordsExhausted => "all words typed",
            EndReason::Ended => "ended early",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first keystroke.
    Idle,
    Active,
    Paused,
    Finished(EndReason),
}

impl Phase {
    pub fn is_finished(self) -> bool {
        matches!(self, Phase::Finished(_))
    }

    pub fn end_reason(self) -> Option<EndReason> {
        match self {
            Phase::Finished(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Everything a single test run tracks. Only `TypingTest` mutates it.
#[derive(Clone, Debug, PartialEq)]
pub struct TestState {
    pub words: Vec<String>,
    pub current_word_index: usize,
    pub current_char_index: usize,
    /// Characters typed so far for the current word.
    pub input: String,
    /// Correctness of each character in `input`.
    pub typed_characters: Vec<bool>,
    /// What was typed for each word reached so far, indexed like `words`.
    pub typed_words: Vec<String>,
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub total_characters_typed: usize,
    pub start_time: Option<Instant>,
    pub end_time: Option<Instant>,
    /// Whole seconds left on the countdown.
    pub time_left: u32,
    /// Time spent engaged in typing; excludes time before the first
    /// keystroke and while paused.
    pub actual_typing_time: Duration,
    pub phase: Phase,
}

impl TestState {
    pub fn new(words: WordList, duration_secs: u32) -> Self {
        Self {
            words: words.into_inner(),
            current_word_index: 0,
            current_char_index: 0,
            input: String::new(),
            typed_characters: Vec::new(),
            typed_words: Vec::new(),
            correct_chars: 0,
            incorrect_chars: 0,
            total_characters_typed: 0,
            start_time: None,
            end_time: None,
            time_left: duration_secs,
            actual_typing_time: Duration::ZERO,
            phase: Phase::Idle,
        }
    }

    pub fn is_test_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// The word being typed, or "" once every word is done.
    pub fn current_word(&self) -> &str {
        self.words
            .get(self.current_word_index)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn wpm(&self) -> u32 {
        metrics::wpm(self.correct_chars, self.actual_typing_time)
    }

    pub fn accuracy(&self) -> u32 {
        metrics::accuracy(self.correct_chars, self.incorrect_chars)
    }

    pub fn chars_typed(&self) -> usize {
        self.correct_chars + self.incorrect_chars
    }

    pub fn total_target_chars(&self) -> usize {
        self.words.iter().map(|w| w.chars().count()).sum()
    }

    /// Wall-clock time between the first keystroke and `now` (or the end).
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => now.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    pub fn progress(&self) -> f64 {
        if self.words.is_empty() {
            return 0.0;
        }
        self.current_word_index as f64 / self.words.len() as f64
    }
}
