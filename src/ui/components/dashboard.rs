use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use keystride::session::result::TestResult;

use crate::ui::components::stats_sidebar::accuracy_color;
use crate::ui::theme::{Palette, Theme};

const LABEL_WIDTH: usize = 10;

/// Final score card shown when a test ends.
pub struct Dashboard<'a> {
    result: &'a TestResult,
    rank: Option<usize>,
    theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(result: &'a TestResult, rank: Option<usize>, theme: &'a Theme) -> Self {
        Self {
            result,
            rank,
            theme,
        }
    }

    /// Label, value, value colour and an optional dim note per row.
    fn rows(&self, colors: &Palette) -> Vec<(&'static str, String, Style, String)> {
        let r = self.result;
        let bold = |c: Color| Style::default().fg(c).add_modifier(Modifier::BOLD);
        let mistakes = if r.mistakes == 0 {
            colors.correct
        } else {
            colors.incorrect
        };
        vec![
            (
                "Speed",
                format!("{} WPM", r.wpm),
                bold(colors.accent),
                format!("{:.1}s of typing", r.active_secs),
            ),
            (
                "Accuracy",
                format!("{}%", r.accuracy),
                bold(accuracy_color(r.accuracy, colors)),
                format!("{}/{} correct", r.correct, r.chars_typed),
            ),
            (
                "Time",
                r.elapsed_display(),
                Style::default().fg(colors.fg),
                String::new(),
            ),
            (
                "Typed",
                format!("{} of {} chars", r.chars_typed, r.total_chars),
                Style::default().fg(colors.fg),
                format!("{}/{} words", r.words_completed, r.total_words),
            ),
            (
                "Mistakes",
                r.mistakes.to_string(),
                Style::default().fg(mistakes),
                String::new(),
            ),
        ]
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let dim = Style::default().fg(colors.pending);

        let mut heading = vec![Span::styled(
            self.result.end_reason.describe(),
            Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
        )];
        if let Some(rank) = self.rank {
            heading.push(Span::styled(
                format!("  new #{} {} score!", rank + 1, self.result.category),
                Style::default().fg(colors.correct),
            ));
        }

        let mut lines = vec![
            Line::from(heading).alignment(Alignment::Center),
            Line::from(""),
        ];
        for (label, value, style, note) in self.rows(colors) {
            let mut spans = vec![
                Span::styled(
                    format!("  {label:<width$}", width = LABEL_WIDTH),
                    Style::default().fg(colors.fg),
                ),
                Span::styled(value, style),
            ];
            if !note.is_empty() {
                spans.push(Span::styled(format!("  ({note})"), dim));
            }
            lines.push(Line::from(spans));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "  [r] New test  [h] High scores  [q] Quit",
            Style::default().fg(colors.accent),
        )));

        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .title(" Test Complete ")
                    .border_style(Style::default().fg(colors.accent))
                    .style(Style::default().bg(colors.bg)),
            )
            .render(area, buf);
    }
}
