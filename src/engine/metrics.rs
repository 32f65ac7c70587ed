use std::time::Duration;

/// Characters per "word" in the WPM formula.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Net words per minute from correct characters over active typing time.
///
/// Zero active time yields zero rather than an infinite rate.
pub fn wpm(correct_chars: usize, active: Duration) -> u32 {
    let ms = active.as_millis();
    if ms == 0 {
        return 0;
    }
    let minutes = ms as f64 / 60_000.0;
    (correct_chars as f64 / CHARS_PER_WORD / minutes).round() as u32
}

/// Percentage of committed characters that were correct, 0..=100.
///
/// A test with nothing typed yet is reported as fully accurate.
pub fn accuracy(correct_chars: usize, incorrect_chars: usize) -> u32 {
    let total = correct_chars + incorrect_chars;
    if total == 0 {
        return 100;
    }
    (correct_chars as f64 / total as f64 * 100.0).round() as u32
}
