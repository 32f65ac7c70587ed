use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use keystride::engine::clock::Clock;
use keystride::engine::validator;
use keystride::session::TypingTest;

use crate::ui::theme::{Palette, Theme};

/// How a single rendered character should look.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Correct,
    Incorrect,
    /// Typed past the end of the target word.
    Extra,
    Cursor,
    Pending,
}

/// Pair every displayed character of a word with its mark.
///
/// `flags` holds the correctness of each typed character; target characters
/// are shown where they exist, typed overflow after them.
fn word_marks(target: &str, typed: &str, flags: &[bool], cursor: Option<usize>) -> Vec<(char, Mark)> {
    let target: Vec<char> = target.chars().collect();
    let typed: Vec<char> = typed.chars().collect();
    let len = target.len().max(typed.len());

    (0..len)
        .map(|j| {
            let mark = if j < typed.len() {
                if j >= target.len() {
                    Mark::Extra
                } else if flags.get(j).copied().unwrap_or(false) {
                    Mark::Correct
                } else {
                    Mark::Incorrect
                }
            } else if cursor == Some(j) {
                Mark::Cursor
            } else {
                Mark::Pending
            };
            let ch = target.get(j).or_else(|| typed.get(j)).copied().unwrap_or(' ');
            (ch, mark)
        })
        .collect()
}

fn mark_style(mark: Mark, colors: &Palette) -> Style {
    match mark {
        Mark::Correct => Style::default().fg(colors.correct),
        Mark::Incorrect => Style::default()
            .fg(colors.incorrect)
            .add_modifier(Modifier::UNDERLINED),
        Mark::Extra => Style::default()
            .fg(colors.incorrect)
            .add_modifier(Modifier::DIM),
        Mark::Cursor => Style::default()
            .fg(colors.cursor_fg)
            .bg(colors.cursor_bg),
        Mark::Pending => Style::default().fg(colors.pending),
    }
}

pub struct TypingArea<'a, C: Clock> {
    test: &'a TypingTest<C>,
    theme: &'a Theme,
}

impl<'a, C: Clock> TypingArea<'a, C> {
    pub fn new(test: &'a TypingTest<C>, theme: &'a Theme) -> Self {
        Self { test, theme }
    }
}

impl<C: Clock> Widget for TypingArea<'_, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let state = self.test.state();
        let start = self.test.visible_start();
        let current = state.current_word_index;

        let mut spans: Vec<Span> = Vec::new();
        for (offset, word) in self.test.visible_words().iter().enumerate() {
            let idx = start + offset;
            let marks = if idx < current {
                let typed = state.typed_words.get(idx).map(String::as_str).unwrap_or("");
                word_marks(word, typed, &validator::diff_word(word, typed), None)
            } else if idx == current && !self.test.is_finished() {
                word_marks(
                    word,
                    &state.input,
                    &state.typed_characters,
                    Some(state.current_char_index),
                )
            } else {
                word_marks(word, "", &[], None)
            };

            let word_len = marks.len();
            for (ch, mark) in marks {
                spans.push(Span::styled(ch.to_string(), mark_style(mark, colors)));
            }

            // Cursor sits on the separator once the word is fully typed
            let separator = if idx == current
                && !self.test.is_finished()
                && state.current_char_index >= word_len
            {
                mark_style(Mark::Cursor, colors)
            } else {
                Style::default().fg(colors.pending)
            };
            spans.push(Span::styled(" ", separator));
        }

        let title = format!(" Line {} ", self.test.current_line_index() + 1);
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.pending))
            .style(Style::default().bg(colors.bg));

        Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks_only(marks: &[(char, Mark)]) -> Vec<Mark> {
        marks.iter().map(|&(_, m)| m).collect()
    }

    #[test]
    fn untyped_word_is_pending() {
        let marks = word_marks("cat", "", &[], None);
        assert_eq!(marks_only(&marks), vec![Mark::Pending; 3]);
        assert_eq!(marks.iter().map(|&(c, _)| c).collect::<String>(), "cat");
    }

    #[test]
    fn current_word_shows_flags_and_cursor() {
        let marks = word_marks("dog", "dx", &[true, false], Some(2));
        assert_eq!(
            marks_only(&marks),
            vec![Mark::Correct, Mark::Incorrect, Mark::Cursor]
        );
        // Target character is displayed even when mistyped
        assert_eq!(marks[1].0, 'o');
    }

    #[test]
    fn overflow_shows_typed_characters() {
        let marks = word_marks("hi", "hiya", &[true, true, false, false], Some(4));
        assert_eq!(
            marks_only(&marks),
            vec![Mark::Correct, Mark::Correct, Mark::Extra, Mark::Extra]
        );
        assert_eq!(marks[3].0, 'a');
    }

    #[test]
    fn skipped_tail_stays_pending() {
        let marks = word_marks("horse", "ho", &[true, true], None);
        assert_eq!(
            marks_only(&marks),
            vec![
                Mark::Correct,
                Mark::Correct,
                Mark::Pending,
                Mark::Pending,
                Mark::Pending
            ]
        );
    }
}
