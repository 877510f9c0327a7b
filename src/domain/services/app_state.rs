#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::actions::help_text;
use super::BubbleList;
use super::Scroll;
use super::Transcripts;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::OrchestratorBox;
use crate::domain::models::Session;
use crate::domain::models::SlashCommand;
use crate::domain::models::TurnError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waiting {
    Session,
    Turn,
}

impl Waiting {
    pub fn label(&self) -> &'static str {
        match self {
            Waiting::Session => return "Creating session",
            Waiting::Turn => return "Researching",
        }
    }
}

pub struct AppState<'a> {
    pub bubble_list: BubbleList<'a>,
    pub feed: Vec<Message>,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub scroll: Scroll,
    pub session: Session,
    pub transcripts: Transcripts,
    pub waiting: Option<Waiting>,
}

impl<'a> AppState<'a> {
    pub async fn new(orchestrator: &OrchestratorBox) -> AppState<'a> {
        let mut app_state = AppState {
            bubble_list: BubbleList::default(),
            feed: vec![],
            last_known_height: 0,
            last_known_width: 0,
            scroll: Scroll::default(),
            session: Session::default(),
            transcripts: Transcripts::default(),
            waiting: None,
        };

        app_state.feed.push(Message::new(
            Author::Scribe,
            "Hey there! Press CTRL+N to start a research session, then ask away. Slash commands like /help work once a session is open, and CTRL+C quits.",
        ));

        if let Err(err) = orchestrator.health_check().await {
            let server_url = Config::get(ConfigKey::ServerURL);
            app_state.feed.push(Message::new_with_type(
                Author::Scribe,
                MessageType::Error,
                &format!("Hey, it looks like the agent server at {server_url} isn't reachable. You should double check that before we start, otherwise every question will fail.\n\nError: {err}"),
            ));
        }

        return app_state;
    }

    pub fn is_waiting(&self) -> bool {
        return self.waiting.is_some();
    }

    /// Input stays disabled until a remote session exists.
    pub fn accepts_input(&self) -> bool {
        return self.waiting.is_none() && self.session.is_active();
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    pub fn add_message(&mut self, message: Message) {
        self.feed.push(message);
        self.sync_dependants();
        self.scroll.last();
    }

    pub fn add_notice(&mut self, text: &str) {
        self.add_message(Message::new(Author::Scribe, text));
    }

    pub fn add_error(&mut self, text: &str) {
        self.add_message(Message::new_with_type(
            Author::Scribe,
            MessageType::Error,
            text,
        ));
    }

    pub fn request_session(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if self.is_waiting() {
            return Ok(());
        }

        self.waiting = Some(Waiting::Session);
        tx.send(Action::CreateSession(self.session.user_id.to_string()))?;

        return Ok(());
    }

    /// Sends the user's question. Without a session it is rejected and
    /// nothing is recorded.
    pub fn submit(&mut self, text: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        match self.session.begin_turn(text) {
            Ok(request) => {
                self.add_message(Message::new(Author::User, text));
                self.waiting = Some(Waiting::Turn);
                tx.send(Action::RunTurn(request))?;
            }
            Err(err) => {
                self.add_error(&err.to_string());
            }
        }

        return Ok(());
    }

    pub fn handle_session_created(&mut self, result: Result<String, TurnError>) {
        if self.waiting != Some(Waiting::Session) {
            tracing::debug!("Ignoring stale session result");
            return;
        }
        self.waiting = None;

        match result {
            Ok(session_id) => {
                self.session.activate(&session_id);
                self.feed.clear();
                self.bubble_list = BubbleList::default();
                self.scroll = Scroll::default();
                self.add_notice(&format!(
                    "Session {session_id} started. What would you like to research?"
                ));
            }
            Err(err) => {
                self.add_error(&err.to_string());
            }
        }
    }

    pub async fn handle_turn_completed(&mut self, result: Result<String, TurnError>) {
        if self.waiting != Some(Waiting::Turn) {
            tracing::debug!("Ignoring stale turn result");
            return;
        }
        self.waiting = None;

        self.session.complete_turn(&result);
        match result {
            Ok(text) => {
                self.add_message(Message::new(Author::Assistant, &text));
            }
            Err(err) => {
                self.add_error(&err.to_string());
            }
        }

        if let Err(err) = self.transcripts.save(&self.session).await {
            tracing::warn!(error = %err, "Failed to save transcript");
        }
    }

    /// Returns (should_break, should_continue) for the UI loop.
    pub fn handle_slash_commands(
        &mut self,
        input_str: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<(bool, bool)> {
        let command = match SlashCommand::parse(input_str) {
            Some(command) => command,
            None => return Ok((false, false)),
        };

        if command.is_quit() {
            return Ok((true, false));
        }

        if command.is_new_session() {
            self.request_session(tx)?;
            return Ok((false, true));
        }

        if command.is_copy() {
            if self.session.history.is_empty() {
                self.add_error("There is nothing to copy yet.");
            } else {
                tx.send(Action::CopyMessages(self.session.history.clone()))?;
            }
            return Ok((false, true));
        }

        if command.is_help() {
            self.add_notice(&help_text());
            return Ok((false, true));
        }

        return Ok((false, false));
    }

    fn sync_dependants(&mut self) {
        self.bubble_list
            .set_messages(&self.feed, self.last_known_width as usize);

        self.scroll.set_state(
            u16::try_from(self.bubble_list.len()).unwrap_or(u16::MAX),
            self.last_known_height,
        );
    }
}
