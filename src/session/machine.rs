use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::engine::clock::{Clock, SystemClock};
use crate::engine::timer::{DEFAULT_INACTIVITY_TIMEOUT, TestTimers, TimerFire};
use crate::engine::validator::{self, MAX_CHARS_PER_WORD};
use crate::engine::window::{DEFAULT_WORDS_PER_LINE, LineWindow};
use crate::generator::WordList;
use crate::session::state::{EndReason, Phase, TestState};

/// A single keystroke forwarded from the input layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestSettings {
    pub inactivity_timeout: Duration,
    pub words_per_line: usize,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
            words_per_line: DEFAULT_WORDS_PER_LINE,
        }
    }
}

/// The typing-test state machine.
///
/// Owns the test state and both timers. Time only moves forward through
/// `tick` and the input operations, each of which reads the injected clock
/// once and processes any timer fires that came due before acting.
pub struct TypingTest<C: Clock = SystemClock> {
    state: TestState,
    timers: TestTimers,
    window: LineWindow,
    last_active: Option<Instant>,
    settings: TestSettings,
    clock: C,
}

impl TypingTest<SystemClock> {
    pub fn new(words: WordList, duration_secs: u32, settings: TestSettings) -> Self {
        Self::with_clock(words, duration_secs, settings, SystemClock)
    }
}

impl<C: Clock> TypingTest<C> {
    pub fn with_clock(words: WordList, duration_secs: u32, settings: TestSettings, clock: C) -> Self {
        let mut test = Self {
            state: TestState::new(words.clone(), duration_secs),
            timers: TestTimers::new(settings.inactivity_timeout),
            window: LineWindow::new(settings.words_per_line),
            last_active: None,
            settings,
            clock,
        };
        test.start_test(words, duration_secs);
        test
    }

    /// Reset to a fresh idle test. Timers from any previous run are cancelled
    /// first; the countdown does not start until the first keystroke.
    pub fn start_test(&mut self, words: WordList, duration_secs: u32) {
        self.timers.cancel_all();
        self.state = TestState::new(words, duration_secs);
        self.window = LineWindow::new(self.settings.words_per_line);
        self.last_active = None;
        debug!(
            words = self.state.words.len(),
            duration_secs, "typing test reset"
        );
    }

    /// Feed one keystroke into the test.
    ///
    /// Returns the end reason if this call ended the test, either because a
    /// timer had already expired or because the keystroke finished the last
    /// word. Rejected characters and input after the end change nothing.
    pub fn handle_input(&mut self, key: KeyInput) -> Option<EndReason> {
        if let KeyInput::Char(ch) = key
            && !validator::accepts(ch)
        {
            return None;
        }
        let now = self.clock.now();
        if let Some(reason) = self.run_due_timers(now) {
            return Some(reason);
        }

        match self.state.phase {
            Phase::Finished(_) => return None,
            Phase::Idle => self.activate(now),
            Phase::Paused => self.reactivate(now),
            Phase::Active => self.fold_active_time(now),
        }
        self.timers.inactivity.rearm(now);

        match key {
            KeyInput::Backspace => {
                self.backspace();
                None
            }
            KeyInput::Char(ch) if validator::is_space(ch) => self.advance_word(now),
            KeyInput::Char(ch) => {
                if self.state.current_char_index < MAX_CHARS_PER_WORD {
                    self.commit(ch);
                }
                None
            }
        }
    }

    /// Fire every timer that came due since the last call.
    pub fn tick(&mut self) -> Option<EndReason> {
        let now = self.clock.now();
        self.run_due_timers(now)
    }

    /// End the test now. Returns false if it had already ended, including
    /// when a timer that came due before this call ended it first.
    pub fn end_test(&mut self) -> bool {
        let now = self.clock.now();
        if self.run_due_timers(now).is_some() {
            return false;
        }
        self.finish(EndReason::Ended, now)
    }

    /// Suspend an active test. The countdown stops and no time accrues until
    /// the test resumes.
    pub fn pause_test(&mut self) -> bool {
        let now = self.clock.now();
        if self.run_due_timers(now).is_some() || self.state.phase != Phase::Active {
            return false;
        }
        self.fold_active_time(now);
        self.state.phase = Phase::Paused;
        self.timers.cancel_all();
        self.last_active = None;
        info!(time_left = self.state.time_left, "typing test paused");
        true
    }

    /// Start or continue the countdown without resetting the time left.
    /// Also valid from idle, which starts the test without a keystroke.
    pub fn resume_test(&mut self) -> bool {
        let now = self.clock.now();
        if self.run_due_timers(now).is_some() {
            return false;
        }
        match self.state.phase {
            Phase::Idle => {
                self.activate(now);
                self.timers.inactivity.rearm(now);
                true
            }
            Phase::Paused => {
                self.reactivate(now);
                self.timers.inactivity.rearm(now);
                true
            }
            Phase::Active | Phase::Finished(_) => false,
        }
    }

    pub fn state(&self) -> &TestState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_test_active(&self) -> bool {
        self.state.is_test_active()
    }

    pub fn is_finished(&self) -> bool {
        self.state.phase.is_finished()
    }

    pub fn current_word(&self) -> &str {
        self.state.current_word()
    }

    pub fn wpm(&self) -> u32 {
        self.state.wpm()
    }

    pub fn accuracy(&self) -> u32 {
        self.state.accuracy()
    }

    pub fn time_left(&self) -> u32 {
        self.state.time_left
    }

    pub fn elapsed(&self) -> Duration {
        self.state.elapsed_at(self.clock.now())
    }

    pub fn progress(&self) -> f64 {
        self.state.progress()
    }

    /// Words on the line containing the current word.
    pub fn visible_words(&self) -> &[String] {
        self.window.visible(&self.state.words)
    }

    /// Index of the first visible word within `words`.
    pub fn visible_start(&self) -> usize {
        self.window.range(self.state.words.len()).start
    }

    pub fn current_line_index(&self) -> usize {
        self.window.line()
    }


    pub fn timers(&self) -> &TestTimers {
        &self.timers
    }

    fn activate(&mut self, now: Instant) {
        self.state.phase = Phase::Active;
        self.state.start_time.get_or_insert(now);
        self.timers.countdown.start(now);
        self.last_active = Some(now);
        info!(
            words = self.state.words.len(),
            time_left = self.state.time_left,
            "typing test started"
        );
    }

    fn reactivate(&mut self, now: Instant) {
        self.state.phase = Phase::Active;
        self.state.start_time.get_or_insert(now);
        self.timers.countdown.start(now);
        self.last_active = Some(now);
        info!(time_left = self.state.time_left, "typing test resumed");
    }

    fn fold_active_time(&mut self, now: Instant) {
        if let Some(last) = self.last_active {
            self.state.actual_typing_time += now.saturating_duration_since(last);
        }
        self.last_active = Some(now);
    }

    fn run_due_timers(&mut self, now: Instant) -> Option<EndReason> {
        while let Some((at, fire)) = self.timers.next_due(now) {
            let ended = match fire {
                TimerFire::CountdownTick => self.on_countdown_tick(at),
                TimerFire::InactivityExpired => self
                    .finish(EndReason::Inactivity, at)
                    .then_some(EndReason::Inactivity),
            };
            if ended.is_some() {
                return ended;
            }
        }
        None
    }

    fn on_countdown_tick(&mut self, at: Instant) -> Option<EndReason> {
        if self.state.phase != Phase::Active {
            return None;
        }
        if self.state.time_left > 0 {
            self.state.time_left -= 1;
            self.fold_active_time(at);
        }
        if self.state.time_left == 0 && self.finish(EndReason::TimeUp, at) {
            return Some(EndReason::TimeUp);
        }
        None
    }

    /// Move to the terminal state. Only the first call has any effect.
    fn finish(&mut self, reason: EndReason, at: Instant) -> bool {
        if self.state.phase.is_finished() {
            return false;
        }
        if self.state.phase == Phase::Active {
            self.fold_active_time(at);
        }
        self.state.phase = Phase::Finished(reason);
        self.state.end_time = Some(at);
        self.timers.cancel_all();
        self.last_active = None;
        info!(
            reason = reason.describe(),
            wpm = self.state.wpm(),
            accuracy = self.state.accuracy(),
            "typing test finished"
        );
        true
    }

    fn commit(&mut self, ch: char) {
        let idx = self.state.current_char_index;
        let correct = validator::is_correct(self.state.current_word(), idx, ch);
        if correct {
            self.state.correct_chars += 1;
        } else {
            self.state.incorrect_chars += 1;
        }
        self.state.typed_characters.push(correct);
        self.state.total_characters_typed += 1;
        self.state.current_char_index += 1;
        self.state.input.push(ch);
        self.record_typed_word();
    }

    fn advance_word(&mut self, now: Instant) -> Option<EndReason> {
        if self.state.current_char_index == 0 {
            return None;
        }
        self.record_typed_word();
        self.state.current_word_index += 1;
        self.state.current_char_index = 0;
        self.state.input.clear();
        self.state.typed_characters.clear();

        if self.state.current_word_index >= self.state.words.len() {
            self.finish(EndReason::WordsExhausted, now);
            return Some(EndReason::WordsExhausted);
        }
        self.sync_window();
        None
    }

    fn backspace(&mut self) {
        if self.state.current_char_index > 0 {
            self.state.current_char_index -= 1;
            self.state.input.pop();
            match self.state.typed_characters.pop() {
                Some(true) => self.state.correct_chars = self.state.correct_chars.saturating_sub(1),
                Some(false) => {
                    self.state.incorrect_chars = self.state.incorrect_chars.saturating_sub(1)
                }
                None => {}
            }
            self.state.total_characters_typed = self.state.total_characters_typed.saturating_sub(1);
            self.record_typed_word();
        } else if self.state.current_word_index > 0 {
            self.move_to_previous_word();
        }
    }

    fn move_to_previous_word(&mut self) {
        self.state.current_word_index -= 1;
        let idx = self.state.current_word_index;
        let restored: String = self
            .state
            .typed_words
            .get(idx)
            .map(|w| w.chars().take(MAX_CHARS_PER_WORD).collect())
            .unwrap_or_default();

        self.state.typed_characters = validator::diff_word(&self.state.words[idx], &restored);
        self.state.current_char_index = restored.chars().count();
        self.state.input = restored;
        self.sync_window();
    }

    fn record_typed_word(&mut self) {
        let idx = self.state.current_word_index;
        if self.state.typed_words.len() <= idx {
            self.state.typed_words.resize(idx + 1, String::new());
        }
        self.state.typed_words[idx].clone_from(&self.state.input);
    }

    fn sync_window(&mut self) {
        if self.window.sync(self.state.current_word_index) {
            trace!(line = self.window.line(), "visible line changed");
        }
    }
}
