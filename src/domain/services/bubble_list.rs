use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::MessageType;

#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

/// Questions sit on the right. Replies, notices and errors sit on the left.
fn alignment_for(author: &Author) -> BubbleAlignment {
    if *author == Author::User {
        return BubbleAlignment::Right;
    }

    return BubbleAlignment::Left;
}

struct FeedEntry<'a> {
    author: Author,
    message_type: MessageType,
    text_len: usize,
    lines: Vec<Line<'a>>,
}

impl<'a> FeedEntry<'a> {
    fn new(message: &Message, line_width: usize) -> FeedEntry<'a> {
        let lines = Bubble::new(message, alignment_for(&message.author), line_width).as_lines();

        return FeedEntry {
            author: message.author.clone(),
            message_type: message.message_type(),
            text_len: message.text.len(),
            lines,
        };
    }

    /// Feed messages never change after they are pushed, but a new session
    /// swaps the whole feed, so an entry at the same position may belong to a
    /// different message.
    fn renders(&self, message: &Message) -> bool {
        return self.author == message.author
            && self.message_type == message.message_type()
            && self.text_len == message.text.len();
    }
}

/// Rendered lines of the feed, one entry per message in feed order. A window
/// resize redraws everything, otherwise only replaced messages are redrawn.
pub struct BubbleList<'a> {
    entries: Vec<FeedEntry<'a>>,
    line_width: usize,
    lines_len: usize,
}

impl<'a> Default for BubbleList<'a> {
    fn default() -> BubbleList<'a> {
        return BubbleList {
            entries: vec![],
            line_width: 0,
            lines_len: 0,
        };
    }
}

impl<'a> BubbleList<'a> {
    pub fn set_messages(&mut self, messages: &[Message], line_width: usize) {
        if self.line_width != line_width {
            self.entries.clear();
            self.line_width = line_width;
        }

        self.entries.truncate(messages.len());

        for (idx, message) in messages.iter().enumerate() {
            match self.entries.get(idx) {
                Some(entry) if entry.renders(message) => continue,
                Some(_) => self.entries[idx] = FeedEntry::new(message, line_width),
                None => self.entries.push(FeedEntry::new(message, line_width)),
            }
        }

        self.lines_len = self
            .entries
            .iter()
            .map(|entry| return entry.lines.len())
            .sum();
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    pub fn is_empty(&self) -> bool {
        return self.lines_len == 0;
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, scroll: u16) {
        let lines: Vec<Line<'a>> = self
            .entries
            .iter()
            .flat_map(|entry| return entry.lines.to_owned())
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}
