#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::MessageType;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    window_max_width: usize,
}

pub struct BubbleConfig {
    pub bubble_padding: usize,
    pub border_elements_length: usize,
    pub outer_padding_percentage: f32,
}

/// Spaces left over once every used width is taken away from the total.
fn remaining_spaces(total: usize, used: &[usize]) -> String {
    let count = used
        .iter()
        .fold(total, |remaining, width| return remaining.saturating_sub(*width));

    return " ".repeat(count);
}

/// Reports come back as loose markdown. Headings and planning steps get
/// their own look, everything else is plain text.
fn line_style(line: &str) -> Style {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return Style::default().add_modifier(Modifier::BOLD);
    }

    if trimmed.starts_with("Planning step:") {
        return Style {
            fg: Some(Color::DarkGray),
            ..Style::default()
        }
        .add_modifier(Modifier::ITALIC);
    }

    return Style::default();
}

impl<'a> Bubble<'_> {
    pub fn new(message: &'a Message, alignment: BubbleAlignment, window_max_width: usize) -> Bubble {
        return Bubble {
            alignment,
            message,
            window_max_width,
        };
    }

    pub fn style_config() -> BubbleConfig {
        return BubbleConfig {
            // Unicode character border + padding.
            bubble_padding: 8,
            // left border + left padding + (text, not counted) + right padding + right border +
            // scrollbar.
            border_elements_length: 5,
            outer_padding_percentage: 0.04,
        };
    }

    pub fn as_lines(&self) -> Vec<Line<'a>> {
        let mut lines: Vec<Line> = vec![];
        let max_line_length = self.get_max_line_length();

        for line in self.message.text.lines() {
            let style = line_style(line);

            if line.len() <= max_line_length {
                lines.push(self.spans_to_line(
                    vec![Span::styled(line.to_owned(), style)],
                    max_line_length,
                ));
                continue;
            }

            let mut word_set: Vec<&str> = vec![];
            let mut line_char_count = 0;

            for word in line.split(' ') {
                if !word_set.is_empty() && word.len() + line_char_count > max_line_length {
                    lines.push(self.spans_to_line(
                        vec![Span::styled(word_set.join(" "), style)],
                        max_line_length,
                    ));

                    word_set = vec![];
                    line_char_count = 0;
                }

                word_set.push(word);
                line_char_count += word.len() + 1;
            }

            lines.push(self.spans_to_line(
                vec![Span::styled(word_set.join(" "), style)],
                max_line_length,
            ));
        }

        return self.wrap_lines_in_bubble(lines, max_line_length);
    }

    fn spans_to_line(&self, mut spans: Vec<Span<'a>>, max_line_length: usize) -> Line<'a> {
        let line_str_len: usize = spans.iter().map(|e| return e.content.len()).sum();
        let fill = remaining_spaces(max_line_length, &[line_str_len]);
        let formatted_line_length =
            line_str_len + fill.len() + Bubble::style_config().bubble_padding;

        let mut wrapped_spans = vec![self.highlight_span("│ ".to_string())];
        wrapped_spans.append(&mut spans);
        wrapped_spans.push(self.highlight_span(format!("{fill} │")));

        let outer_bubble_padding =
            remaining_spaces(self.window_max_width, &[formatted_line_length]);

        if self.alignment == BubbleAlignment::Left {
            wrapped_spans.push(Span::from(outer_bubble_padding));
            return Line::from(wrapped_spans);
        }

        let mut line_spans = vec![Span::from(outer_bubble_padding)];
        line_spans.extend(wrapped_spans);

        return Line::from(line_spans);
    }

    fn get_max_line_length(&self) -> usize {
        let style_config = Bubble::style_config();
        // Add a minimum 4% of padding on the side.
        let min_bubble_padding_length = ((self.window_max_width as f32
            * style_config.outer_padding_percentage)
            .ceil()) as usize;

        // Border elements + minimum bubble padding.
        let line_border_width = style_config.border_elements_length + min_bubble_padding_length;
        let available = self.window_max_width.saturating_sub(line_border_width);

        let longest_line = self
            .message
            .text
            .lines()
            .map(|line| {
                return line.len();
            })
            .max()
            .unwrap_or(0);

        let author_len = self.message.author.to_string().len();

        return longest_line.min(available).max(author_len);
    }

    fn wrap_lines_in_bubble(&self, lines: Vec<Line<'a>>, max_line_length: usize) -> Vec<Line<'a>> {
        // Add 2 for the vertical bars.
        let inner_bar = "─".repeat(max_line_length + 2);
        let author = self.message.author.to_string();
        let top_bar = format!(
            "╭{author}{}╮",
            "─".repeat((max_line_length + 2).saturating_sub(author.len()))
        );
        let bottom_bar = format!("╰{inner_bar}╯");
        let bar_bubble_padding = remaining_spaces(
            self.window_max_width,
            &[max_line_length, Bubble::style_config().bubble_padding],
        );

        let mut res = vec![];
        if self.alignment == BubbleAlignment::Left {
            res.push(self.highlight_line(format!("{top_bar}{bar_bubble_padding}")));
            res.extend(lines);
            res.push(self.highlight_line(format!("{bottom_bar}{bar_bubble_padding}")));
        } else {
            res.push(self.highlight_line(format!("{bar_bubble_padding}{top_bar}")));
            res.extend(lines);
            res.push(self.highlight_line(format!("{bar_bubble_padding}{bottom_bar}")));
        }

        return res;
    }

    fn highlight_span(&self, text: String) -> Span<'a> {
        if self.message.message_type() == MessageType::Error {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Red),
                    ..Style::default()
                },
            );
        }

        match self.message.author {
            Author::Scribe => {
                return Span::styled(
                    text,
                    Style {
                        fg: Some(Color::Rgb(138, 85, 63)), // Brown
                        ..Style::default()
                    },
                );
            }
            Author::Assistant => {
                return Span::styled(
                    text,
                    Style {
                        fg: Some(Color::Cyan),
                        ..Style::default()
                    },
                );
            }
            Author::User => return Span::from(text),
        }
    }

    fn highlight_line(&self, text: String) -> Line<'a> {
        return Line::from(self.highlight_span(text));
    }
}
