use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;

pub struct PromptInput {}

impl<'a> PromptInput {
    /// A fresh input box. The title carries the active session so the user
    /// can tell which remote conversation they are typing into.
    pub fn for_session(session_id: &str) -> tui_textarea::TextArea<'a> {
        let mut textarea = tui_textarea::TextArea::default();
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title(format!("Research question ({session_id})"))
                .padding(Padding::new(1, 1, 0, 0)),
        );

        return textarea;
    }
}
