use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use keystride::engine::clock::Clock;
use keystride::session::result::format_clock;
use keystride::session::{Phase, TypingTest};
use keystride::store::schema::HighScore;

use crate::ui::theme::{Palette, Theme};

pub fn accuracy_color(accuracy: u32, colors: &Palette) -> ratatui::style::Color {
    if accuracy >= 95 {
        colors.correct
    } else if accuracy >= 85 {
        colors.warning
    } else {
        colors.incorrect
    }
}

pub fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "start typing",
        Phase::Active => "running",
        Phase::Paused => "paused",
        Phase::Finished(_) => "finished",
    }
}

/// Live numbers for the running test.
pub struct StatsSidebar<'a, C: Clock> {
    test: &'a TypingTest<C>,
    best: Option<&'a HighScore>,
    theme: &'a Theme,
}

impl<'a, C: Clock> StatsSidebar<'a, C> {
    pub fn new(test: &'a TypingTest<C>, best: Option<&'a HighScore>, theme: &'a Theme) -> Self {
        Self { test, best, theme }
    }
}

impl<C: Clock> Widget for StatsSidebar<'_, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let state = self.test.state();
        let label = Style::default().fg(colors.fg);
        let dim = Style::default().fg(colors.pending);

        let time_style = if state.time_left <= 10 {
            Style::default().fg(colors.warning).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.accent)
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Time:     ", label),
                Span::styled(format_clock(u64::from(state.time_left)), time_style),
            ]),
            Line::from(vec![
                Span::styled("WPM:      ", label),
                Span::styled(
                    self.test.wpm().to_string(),
                    Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Accuracy: ", label),
                Span::styled(
                    format!("{}%", self.test.accuracy()),
                    Style::default().fg(accuracy_color(self.test.accuracy(), colors)),
                ),
            ]),
            Line::from(vec![
                Span::styled("Words:    ", label),
                Span::styled(
                    format!(
                        "{}/{}",
                        state.current_word_index.min(state.words.len()),
                        state.words.len()
                    ),
                    dim,
                ),
            ]),
            Line::from(vec![
                Span::styled("Mistakes: ", label),
                Span::styled(state.incorrect_chars.to_string(), dim),
            ]),
            Line::from(""),
            Line::from(Span::styled(phase_label(state.phase), dim)),
        ];

        if let Some(best) = self.best {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Best:     ", label),
                Span::styled(format!("{} WPM", best.wpm), Style::default().fg(colors.correct)),
            ]));
        }

        let block = Block::bordered()
            .title(" Stats ")
            .border_style(Style::default().fg(colors.pending))
            .style(Style::default().bg(colors.bg));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
