use anyhow::Result;
use tracing::{info, warn};

use keystride::config::Config;
use keystride::engine::clock::{Clock, SystemClock};
use keystride::generator::WordSource;
use keystride::session::result::TestResult;
use keystride::session::{EndReason, KeyInput, Phase, TypingTest};
use keystride::store::json_store::JsonStore;
use keystride::store::schema::{HighScore, HighScoreData};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Typing,
    Result,
    HighScores,
}

pub struct App<C: Clock = SystemClock> {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub test: TypingTest<C>,
    pub last_result: Option<TestResult>,
    pub last_rank: Option<usize>,
    pub high_scores: HighScoreData,
    pub store: Option<JsonStore>,
    pub status: Option<String>,
    pub should_quit: bool,
    source: Box<dyn WordSource>,
    category: String,
}

impl App<SystemClock> {
    pub fn new(config: Config, source: Box<dyn WordSource>, theme: &'static Theme) -> Result<Self> {
        let store = match JsonStore::new() {
            Ok(store) => {
                info!(dir = %store.base_dir().display(), "score store ready");
                Some(store)
            }
            Err(e) => {
                warn!(error = %e, "score store unavailable, scores kept in memory");
                None
            }
        };
        Self::with_parts(config, source, store, theme, SystemClock)
    }
}

impl<C: Clock> App<C> {
    pub fn with_parts(
        config: Config,
        mut source: Box<dyn WordSource>,
        store: Option<JsonStore>,
        theme: &'static Theme,
        clock: C,
    ) -> Result<Self> {
        let words = source.next_words()?;
        let category = source.category();
        let test = TypingTest::with_clock(
            words,
            config.duration_secs,
            config.test_settings(),
            clock,
        );
        let high_scores = store
            .as_ref()
            .map(JsonStore::load_high_scores)
            .unwrap_or_default();

        Ok(Self {
            screen: AppScreen::Typing,
            config,
            theme,
            test,
            last_result: None,
            last_rank: None,
            high_scores,
            store,
            status: None,
            should_quit: false,
            source,
            category,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn best_score(&self) -> Option<&HighScore> {
        self.high_scores.best(&self.category)
    }

    /// Draw a fresh word list and reset the test.
    pub fn start_test(&mut self) {
        match self.source.next_words() {
            Ok(words) => {
                self.category = self.source.category();
                self.test.start_test(words, self.config.duration_secs);
                self.last_result = None;
                self.last_rank = None;
                self.status = None;
                self.screen = AppScreen::Typing;
            }
            Err(e) => {
                warn!(error = %e, "could not generate words");
                self.status = Some(format!("Could not generate words: {e}"));
            }
        }
    }

    pub fn type_key(&mut self, key: KeyInput) {
        if let Some(reason) = self.test.handle_input(key) {
            self.on_test_finished(reason);
        }
    }

    pub fn on_tick(&mut self) {
        if let Some(reason) = self.test.tick() {
            self.on_test_finished(reason);
        }
    }

    pub fn end_test(&mut self) {
        self.with_test(|test| {
            test.end_test();
        });
    }

    pub fn toggle_pause(&mut self) {
        self.with_test(|test| match test.phase() {
            Phase::Active => {
                test.pause_test();
            }
            Phase::Paused => {
                test.resume_test();
            }
            Phase::Idle | Phase::Finished(_) => {}
        });
    }

    /// Run a lifecycle operation and pick up the end of the test whether the
    /// operation itself or an overdue timer caused it.
    fn with_test(&mut self, op: impl FnOnce(&mut TypingTest<C>)) {
        let was_finished = self.test.is_finished();
        op(&mut self.test);
        if !was_finished && let Some(reason) = self.test.phase().end_reason() {
            self.on_test_finished(reason);
        }
    }

    pub fn go_to_high_scores(&mut self) {
        self.screen = AppScreen::HighScores;
    }

    pub fn go_to_result(&mut self) {
        self.screen = if self.last_result.is_some() {
            AppScreen::Result
        } else {
            AppScreen::Typing
        };
    }

    fn on_test_finished(&mut self, reason: EndReason) {
        let result = TestResult::from_test(&self.test, &self.category);
        info!(
            reason = reason.describe(),
            wpm = result.wpm,
            accuracy = result.accuracy,
            category = %self.category,
            "test finished"
        );

        // An untouched test is not a score
        self.last_rank = if result.chars_typed == 0 {
            None
        } else {
            self.record(&result)
        };
        self.last_result = Some(result);
        self.screen = AppScreen::Result;
    }

    fn record(&mut self, result: &TestResult) -> Option<usize> {
        if let Some(ref store) = self.store {
            match store.record_result(result) {
                Ok(rank) => {
                    self.high_scores = store.load_high_scores();
                    return rank;
                }
                Err(e) => {
                    warn!(error = %e, "failed to save test result");
                    self.status = Some(format!("Could not save result: {e}"));
                }
            }
        }
        self.high_scores
            .record(&result.category, HighScore::from(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystride::engine::clock::ManualClock;
    use keystride::generator::passage::PassageSource;
    use tempfile::TempDir;

    const PASSAGE: &str = "cat dog sun map red";

    fn theme() -> &'static Theme {
        Box::leak(Box::new(Theme::default()))
    }

    fn make_app(store: Option<JsonStore>) -> (App<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let source = PassageSource::from_text(PASSAGE).unwrap();
        let config = Config {
            duration_secs: 10,
            ..Config::default()
        };
        let app = App::with_parts(config, Box::new(source), store, theme(), clock.clone()).unwrap();
        (app, clock)
    }

    fn type_str(app: &mut App<ManualClock>, text: &str) {
        for ch in text.chars() {
            app.type_key(KeyInput::Char(ch));
        }
    }

    #[test]
    fn finishing_the_passage_shows_result() {
        let (mut app, clock) = make_app(None);
        type_str(&mut app, "cat dog sun map ");
        clock.advance_ms(500);
        type_str(&mut app, "red ");

        assert_eq!(app.screen, AppScreen::Result);
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.end_reason, EndReason::WordsExhausted);
        assert_eq!(result.category, "passage");
        assert_eq!(app.last_rank, Some(0));
        assert!(app.best_score().is_some());
    }

    #[test]
    fn countdown_expiry_is_noticed_on_tick() {
        let (mut app, clock) = make_app(None);
        type_str(&mut app, "ca");
        for _ in 0..10 {
            clock.advance_ms(900);
            app.type_key(KeyInput::Char('t'));
            app.type_key(KeyInput::Backspace);
        }
        clock.advance_ms(2_000);
        app.on_tick();

        assert_eq!(app.screen, AppScreen::Result);
        assert_eq!(
            app.last_result.as_ref().map(|r| r.end_reason),
            Some(EndReason::TimeUp)
        );
    }

    #[test]
    fn ending_untouched_test_records_nothing() {
        let (mut app, _clock) = make_app(None);
        app.end_test();

        assert_eq!(app.screen, AppScreen::Result);
        assert_eq!(app.last_rank, None);
        assert!(app.high_scores.categories.is_empty());
    }

    #[test]
    fn toggle_pause_round_trips() {
        let (mut app, _clock) = make_app(None);
        app.toggle_pause();
        assert_eq!(app.test.phase(), Phase::Idle);

        type_str(&mut app, "c");
        app.toggle_pause();
        assert_eq!(app.test.phase(), Phase::Paused);
        app.toggle_pause();
        assert_eq!(app.test.phase(), Phase::Active);
    }

    #[test]
    fn overdue_countdown_wins_over_explicit_end() {
        let (mut app, clock) = make_app(None);
        type_str(&mut app, "ca");
        clock.advance_ms(15_000);
        app.end_test();

        assert_eq!(app.screen, AppScreen::Result);
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.end_reason, EndReason::TimeUp);
        assert_eq!(result.active_secs, 10.0);
    }

    #[test]
    fn pause_after_expiry_shows_result() {
        let (mut app, clock) = make_app(None);
        type_str(&mut app, "c");
        clock.advance_ms(12_000);
        app.toggle_pause();

        assert_eq!(app.screen, AppScreen::Result);
        assert_eq!(
            app.last_result.as_ref().map(|r| r.end_reason),
            Some(EndReason::TimeUp)
        );
    }

    #[test]
    fn restart_resets_screen_and_result() {
        let (mut app, _clock) = make_app(None);
        type_str(&mut app, "cat");
        app.end_test();
        assert_eq!(app.screen, AppScreen::Result);

        app.start_test();
        assert_eq!(app.screen, AppScreen::Typing);
        assert!(app.last_result.is_none());
        assert_eq!(app.test.phase(), Phase::Idle);
    }

    #[test]
    fn results_are_persisted_through_store() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let (mut app, _clock) = make_app(Some(store));
        type_str(&mut app, "cat dog");
        app.end_test();

        let reopened = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.load_history().results.len(), 1);
        assert_eq!(reopened.load_high_scores().scores("passage").len(), 1);
    }
}
