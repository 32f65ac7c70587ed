use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use keystride::config::Config;
use keystride::engine::clock::ManualClock;
use keystride::generator::mixed::MixedWords;
use keystride::generator::passage::PassageSource;
use keystride::generator::{Difficulty, WordList, WordSource, WordSourceError};
use keystride::session::result::TestResult;
use keystride::session::{EndReason, KeyInput, Phase, TestSettings, TypingTest};
use keystride::store::json_store::JsonStore;

fn new_test(words: &[&str], secs: u32) -> (TypingTest<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let list = WordList::new(words.iter().copied()).unwrap();
    let test = TypingTest::with_clock(list, secs, TestSettings::default(), clock.clone());
    (test, clock)
}

fn type_str(test: &mut TypingTest<ManualClock>, text: &str) -> Option<EndReason> {
    text.chars()
        .filter_map(|ch| test.handle_input(KeyInput::Char(ch)))
        .last()
}

#[test]
fn cat_dog_session() {
    let (mut test, _clock) = new_test(&["cat", "dog"], 60);

    assert_eq!(type_str(&mut test, "cat "), None);
    let s = test.state();
    assert_eq!(s.current_word_index, 1);
    assert_eq!((s.correct_chars, s.incorrect_chars), (3, 0));
    assert_eq!(s.typed_words, vec!["cat"]);

    assert_eq!(type_str(&mut test, "dx "), Some(EndReason::WordsExhausted));
    let s = test.state();
    assert_eq!(s.current_word_index, 2);
    assert_eq!((s.correct_chars, s.incorrect_chars), (4, 1));
    assert_eq!(s.typed_words, vec!["cat", "dx"]);
    assert_eq!(test.phase(), Phase::Finished(EndReason::WordsExhausted));
    assert_eq!(test.time_left(), 60);
}

#[test]
fn backspace_undoes_commits_exactly() {
    for typed in ["c", "cx", "cat", "zzzz", "ca!?"] {
        let (mut test, _clock) = new_test(&["cat", "dog"], 60);
        test.handle_input(KeyInput::Char('c'));
        let before = test.state().clone();

        type_str(&mut test, typed);
        for _ in typed.chars() {
            test.handle_input(KeyInput::Backspace);
        }

        let after = test.state();
        assert_eq!(after.input, before.input, "input after undoing {typed:?}");
        assert_eq!(after.current_char_index, before.current_char_index);
        assert_eq!(after.typed_characters, before.typed_characters);
        assert_eq!(after.correct_chars, before.correct_chars);
        assert_eq!(after.incorrect_chars, before.incorrect_chars);
        assert_eq!(after.total_characters_typed, before.total_characters_typed);
    }
}

#[test]
fn backspace_at_first_word_start_is_noop() {
    let (mut test, _clock) = new_test(&["cat", "dog"], 60);
    type_str(&mut test, "ca");
    for _ in 0..3 {
        test.handle_input(KeyInput::Backspace);
    }
    let s = test.state();
    assert_eq!(s.input, "");
    assert_eq!(s.correct_chars, 0);
    assert_eq!(s.current_word_index, 0);
}

#[test]
fn space_on_empty_word_never_advances() {
    let (mut test, _clock) = new_test(&["cat", "dog"], 60);
    type_str(&mut test, "   ");
    assert_eq!(test.state().current_word_index, 0);
    type_str(&mut test, "cat   ");
    assert_eq!(test.state().current_word_index, 1);
}

#[test]
fn partial_word_is_recorded_on_advance() {
    let (mut test, _clock) = new_test(&["horse", "dog"], 60);
    type_str(&mut test, "ho ");
    assert_eq!(test.state().typed_words[0], "ho");
    assert_eq!(test.state().current_word_index, 1);
}

#[test]
fn countdown_ends_test_and_end_is_idempotent() {
    let (mut test, clock) = new_test(&["alpha", "beta", "gamma"], 3);
    type_str(&mut test, "al");
    clock.advance(Duration::from_secs(3));

    assert_eq!(test.tick(), Some(EndReason::TimeUp));
    assert_eq!(test.time_left(), 0);
    let frozen = test.state().clone();

    clock.advance_ms(1_500);
    assert!(!test.end_test());
    assert_eq!(test.tick(), None);
    assert_eq!(test.state(), &frozen);
    assert_eq!(test.state().actual_typing_time, Duration::from_secs(3));
}

#[test]
fn inactivity_ends_a_stalled_test() {
    let (mut test, clock) = new_test(&["alpha", "beta"], 60);
    type_str(&mut test, "a");
    clock.advance(Duration::from_secs(31));

    assert_eq!(test.tick(), Some(EndReason::Inactivity));
    assert_eq!(test.time_left(), 30);
    assert_eq!(test.elapsed(), Duration::from_secs(30));
}

#[test]
fn zero_typing_time_gives_zero_wpm() {
    let (mut test, _clock) = new_test(&["cat"], 60);
    type_str(&mut test, "ca");
    assert_eq!(test.state().actual_typing_time, Duration::ZERO);
    assert_eq!(test.wpm(), 0);
    assert_eq!(test.accuracy(), 100);
}

#[test]
fn accuracy_stays_in_range() {
    let (mut test, clock) = new_test(&["cat", "dog", "sun"], 60);
    for (i, ch) in "cqt dxg s!n".chars().enumerate() {
        clock.advance_ms(150 + i as u64);
        test.handle_input(KeyInput::Char(ch));
        assert!(test.accuracy() <= 100);
    }
    assert_eq!(test.accuracy(), 67);
}

#[test]
fn pause_excludes_time_from_active_typing() {
    let (mut test, clock) = new_test(&["alpha", "beta"], 60);
    type_str(&mut test, "al");
    clock.advance_ms(2_000);
    test.tick();
    assert!(test.pause_test());

    clock.advance(Duration::from_secs(120));
    assert_eq!(test.tick(), None);
    assert_eq!(test.time_left(), 58);

    type_str(&mut test, "p");
    assert_eq!(test.phase(), Phase::Active);
    clock.advance_ms(1_000);
    test.tick();
    assert_eq!(test.time_left(), 57);
    assert_eq!(test.state().actual_typing_time, Duration::from_secs(3));
}

#[test]
fn lifecycle_calls_settle_overdue_timers_first() {
    let (mut test, clock) = new_test(&["alpha", "beta"], 60);
    type_str(&mut test, "al");
    clock.advance(Duration::from_secs(4));
    assert!(test.pause_test());
    assert_eq!(test.time_left(), 56);

    let (mut test, clock) = new_test(&["alpha", "beta"], 5);
    type_str(&mut test, "al");
    clock.advance(Duration::from_secs(9));
    assert!(!test.end_test());
    assert_eq!(test.phase(), Phase::Finished(EndReason::TimeUp));
    assert_eq!(test.state().actual_typing_time, Duration::from_secs(5));
}

#[test]
fn passage_result_round_trips_through_store() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();

    let mut source = PassageSource::from_text("the quick brown fox jumps").unwrap();
    let clock = ManualClock::new();
    let mut test =
        TypingTest::with_clock(source.next_words().unwrap(), 60, TestSettings::default(), clock.clone());
    for word in ["the ", "quick ", "brown ", "fox "] {
        type_str(&mut test, word);
        clock.advance_ms(1_000);
    }
    assert_eq!(type_str(&mut test, "jumps "), Some(EndReason::WordsExhausted));

    let result = TestResult::from_test(&test, &source.category());
    assert_eq!(result.accuracy, 100);
    assert_eq!(result.end_reason, EndReason::WordsExhausted);
    assert_eq!(store.record_result(&result).unwrap(), Some(0));

    let reopened = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let history = reopened.load_history();
    assert_eq!(history.results, vec![result.clone()]);
    assert_eq!(reopened.load_high_scores().best("passage").map(|s| s.wpm), Some(result.wpm));
}

#[test]
fn stale_high_score_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("high_scores.json"),
        r#"{"schema_version":0,"categories":{"medium":[]}}"#,
    )
    .unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    assert!(store.load_high_scores().categories.is_empty());
}

#[test]
fn passage_bounds_are_enforced() {
    assert_eq!(
        PassageSource::from_text("too short").err(),
        Some(WordSourceError::TooFewWords { found: 2, min: 5 })
    );
    let long = vec!["word"; 51].join(" ");
    assert!(matches!(
        PassageSource::from_text(&long),
        Err(WordSourceError::TooManyWords { found: 51, .. })
    ));
}

#[test]
fn generated_lists_drive_a_full_test() {
    let mut source = MixedWords::new(12, Difficulty::Hard).unwrap();
    let words = source.next_words().unwrap();
    assert_eq!(words.len(), 12);

    let clock = ManualClock::new();
    let targets: Vec<String> = words.as_slice().to_vec();
    let mut test = TypingTest::with_clock(words, 60, TestSettings::default(), clock.clone());
    let mut ended = None;
    for word in &targets {
        clock.advance_ms(400);
        ended = type_str(&mut test, &format!("{word} "));
    }
    assert_eq!(ended, Some(EndReason::WordsExhausted));
    assert_eq!(test.accuracy(), 100);
    assert_eq!(source.category(), "hard");
}

#[test]
fn partial_config_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "duration_secs = 30\nwords_per_line = 0\n").unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.duration_secs, 30);
    assert_eq!(config.words_per_line, 18);
    assert_eq!(config.difficulty, Difficulty::Medium);
    assert_eq!(config.test_settings().inactivity_timeout, Duration::from_secs(30));
}
