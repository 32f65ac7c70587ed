/// Longest input accepted for a single word; extra characters are dropped.
pub const MAX_CHARS_PER_WORD: usize = 20;

/// Whether `ch` may be typed into a test at all.
///
/// Accepts ASCII letters, digits, whitespace and punctuation. Everything else
/// (control characters, non-ASCII) is rejected so character indices stay
/// aligned with byte positions in the input buffer.
pub fn accepts(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch.is_ascii_whitespace() || ch.is_ascii_punctuation()
}

/// A space ends the current word instead of being committed.
pub fn is_space(ch: char) -> bool {
    ch == ' '
}

/// Correctness of `typed` against the character expected at `idx` in `word`.
/// Positions past the end of the word are always incorrect.
pub fn is_correct(word: &str, idx: usize, typed: char) -> bool {
    word.chars().nth(idx).is_some_and(|expected| expected == typed)
}

/// Per-position correctness of `typed` against `word`.
pub fn diff_word(word: &str, typed: &str) -> Vec<bool> {
    let mut expected = word.chars();
    typed
        .chars()
        .map(|ch| expected.next().is_some_and(|e| e == ch))
        .collect()
}
