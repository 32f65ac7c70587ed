use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::clock::Clock;
use crate::session::machine::TypingTest;
use crate::session::state::EndReason;

/// Final score of a finished (or abandoned) test.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TestResult {
    pub wpm: u32,
    pub accuracy: u32,
    pub correct: usize,
    /// Incorrect characters still standing at the end of the test.
    pub mistakes: usize,
    pub chars_typed: usize,
    pub total_chars: usize,
    /// Forward keystrokes minus backspaced ones.
    pub keystrokes: usize,
    pub words_completed: usize,
    pub total_words: usize,
    pub elapsed_secs: f64,
    pub active_secs: f64,
    #[serde(default = "default_end_reason")]
    pub end_reason: EndReason,
    pub category: String,
    pub timestamp: DateTime<Utc>,
}

fn default_end_reason() -> EndReason {
    EndReason::Ended
}

impl TestResult {
    pub fn from_test<C: Clock>(test: &TypingTest<C>, category: &str) -> Self {
        let state = test.state();
        Self {
            wpm: state.wpm(),
            accuracy: state.accuracy(),
            correct: state.correct_chars,
            mistakes: state.incorrect_chars,
            chars_typed: state.chars_typed(),
            total_chars: state.total_target_chars(),
            keystrokes: state.total_characters_typed,
            words_completed: state.current_word_index.min(state.words.len()),
            total_words: state.words.len(),
            elapsed_secs: test.elapsed().as_secs_f64(),
            active_secs: state.actual_typing_time.as_secs_f64(),
            end_reason: state.phase.end_reason().unwrap_or(EndReason::Ended),
            category: category.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Elapsed time as m:ss.
    pub fn elapsed_display(&self) -> String {
        format_clock(self.elapsed_secs.round() as u64)
    }
}

/// Seconds as m:ss.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::ManualClock;
    use crate::generator::WordList;
    use crate::session::machine::{KeyInput, TestSettings};

    #[test]
    fn result_reflects_final_state() {
        let clock = ManualClock::new();
        let words = WordList::new(["cat", "dog"]).unwrap();
        let mut test = TypingTest::with_clock(words, 60, TestSettings::default(), clock.clone());

        for ch in "cat".chars() {
            clock.advance_ms(200);
            test.handle_input(KeyInput::Char(ch));
        }
        test.handle_input(KeyInput::Char(' '));
        for ch in "dx".chars() {
            clock.advance_ms(200);
            test.handle_input(KeyInput::Char(ch));
        }
        test.handle_input(KeyInput::Char(' '));

        let result = TestResult::from_test(&test, "medium");
        assert_eq!(result.correct, 4);
        assert_eq!(result.mistakes, 1);
        assert_eq!(result.chars_typed, 5);
        assert_eq!(result.total_chars, 6);
        assert_eq!(result.words_completed, 2);
        assert_eq!(result.accuracy, 80);
        assert_eq!(result.end_reason, EndReason::WordsExhausted);
        assert_eq!(result.category, "medium");
        // first keystroke at 200ms, last at 1000ms
        assert!((result.active_secs - 0.8).abs() < 1e-9);
        assert!((result.elapsed_secs - 0.8).abs() < 1e-9);
        // 4 chars / 5 / (0.8s / 60s) = 60
        assert_eq!(result.wpm, 60);
    }

    #[test]
    fn formats_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(600), "10:00");
    }

    #[test]
    fn result_serde_roundtrip() {
        let clock = ManualClock::new();
        let words = WordList::new(["cat"]).unwrap();
        let mut test = TypingTest::with_clock(words, 60, TestSettings::default(), clock);
        test.end_test();
        let result = TestResult::from_test(&test, "easy");
        let json = serde_json::to_string(&result).unwrap();
        let back: TestResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
