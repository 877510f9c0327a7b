use ratatui::prelude::Alignment;
use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const SPINNER: [&str; 4] = ["   ", ".  ", ".. ", "..."];

/// Box rendered in place of the prompt input while it is unavailable, either
/// because a request is outstanding or because no session exists yet.
#[derive(Default)]
pub struct Loading {
    ticks: usize,
}

impl Loading {
    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    pub fn render_waiting<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, label: &str) {
        let spinner = SPINNER[self.ticks % SPINNER.len()];
        self.render_text(frame, rect, &format!("{label}{spinner}"));
    }

    pub fn render_text<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, text: &str) {
        frame.render_widget(
            Paragraph::new(text.to_string())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Double)
                        .padding(Padding::new(1, 1, 0, 0)),
                )
                .alignment(Alignment::Center),
            rect,
        );
    }
}
