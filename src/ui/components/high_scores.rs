use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use keystride::store::schema::HighScoreData;

use crate::ui::theme::Theme;

/// Per-category high-score tables, current category first.
pub struct HighScoresView<'a> {
    data: &'a HighScoreData,
    current: &'a str,
    theme: &'a Theme,
}

impl<'a> HighScoresView<'a> {
    pub fn new(data: &'a HighScoreData, current: &'a str, theme: &'a Theme) -> Self {
        Self {
            data,
            current,
            theme,
        }
    }
}

impl Widget for HighScoresView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut lines: Vec<Line> = Vec::new();

        let mut categories: Vec<&String> = self.data.categories.keys().collect();
        categories.sort_by_key(|c| c.as_str() != self.current);

        if categories.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No scores yet. Finish a test to set one.",
                Style::default().fg(colors.pending),
            )));
        }

        for category in categories {
            let heading = if category == self.current {
                Style::default().fg(colors.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg).add_modifier(Modifier::BOLD)
            };
            lines.push(Line::from(Span::styled(format!("  {category}"), heading)));
            for (i, score) in self.data.scores(category).iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:>2}. ", i + 1),
                        Style::default().fg(colors.pending),
                    ),
                    Span::styled(
                        format!("{:>4} WPM", score.wpm),
                        Style::default().fg(colors.accent),
                    ),
                    Span::styled(
                        format!("  {:>3}%  {}", score.accuracy, score.timestamp.format("%Y-%m-%d %H:%M")),
                        Style::default().fg(colors.pending),
                    ),
                ]));
            }
            lines.push(Line::from(""));
        }

        let block = Block::bordered()
            .title(" High Scores  [Esc] back ")
            .border_style(Style::default().fg(colors.accent))
            .style(Style::default().bg(colors.bg));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
