#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::clipboard::format_messages;
use super::clipboard::ClipboardService;
use super::open_session;
use super::run_turn;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::OrchestratorBox;
use crate::domain::models::SessionIdStyle;
use crate::domain::models::TurnError;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /new (/n) - Starts a new research session. The previous conversation is kept on disk and can be read with `scribe sessions show`.
- /copy (/c) - Copies the conversation of the current session to your clipboard.
- /quit /exit (/q) - Exit Scribe.
- /help (/h) - Provides this help menu.

HOTKEYS:
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+N - Start a new research session.
- CTRL+C - Interrupt waiting for the research assistant if in progress, otherwise exit.

Research runs can take several minutes. The assistant plans, searches, fact checks and writes a report before it answers, so only the final report and its planning steps are shown.
        "#;

    return text.trim().to_string();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Work {
    Session,
    Turn,
}

fn copy_messages(messages: &[Message], tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    let notice = match ClipboardService::set(format_messages(messages)) {
        Ok(_) => Message::new(Author::Scribe, "Copied chat log to clipboard."),
        Err(err) => Message::new_with_type(
            Author::Scribe,
            MessageType::Error,
            &format!("Failed to copy to clipboard: {err}"),
        ),
    };

    tx.send(Event::Notice(notice))?;

    return Ok(());
}

fn session_id_style() -> SessionIdStyle {
    return SessionIdStyle::parse(&Config::get(ConfigKey::SessionIdStyle))
        .unwrap_or(SessionIdStyle::Timestamp);
}

fn aborted_event(work: Work) -> Event {
    match work {
        Work::Session => return Event::SessionCreated(Err(TurnError::Aborted)),
        Work::Turn => return Event::TurnCompleted(Err(TurnError::Aborted)),
    }
}

/// Runs network work off the UI task. One worker at a time, its result is
/// sent back as an [`Event`].
pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        orchestrator: Arc<OrchestratorBox>,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let mut worker: Option<(Work, JoinHandle<Result<()>>)> = None;

        while let Some(action) = rx.recv().await {
            let worker_tx = tx.clone();
            let worker_orchestrator = orchestrator.clone();

            match action {
                Action::CopyMessages(messages) => {
                    copy_messages(&messages, &tx)?;
                }
                Action::Abort() => {
                    if let Some((work, handle)) = worker.take() {
                        if !handle.is_finished() {
                            handle.abort();
                            tracing::debug!(work = ?work, "Worker aborted");
                            tx.send(aborted_event(work))?;
                        }
                    }
                }
                Action::CreateSession(user_id) => {
                    let style = session_id_style();
                    let handle = tokio::spawn(async move {
                        let res = open_session(&worker_orchestrator, &user_id, style).await;
                        if let Err(err) = &res {
                            tracing::error!(error = %err, "Session creation failed");
                        }

                        worker_tx.send(Event::SessionCreated(res))?;
                        return Ok(());
                    });

                    worker = Some((Work::Session, handle));
                }
                Action::RunTurn(request) => {
                    let handle = tokio::spawn(async move {
                        let res = run_turn(&worker_orchestrator, &request).await;
                        if let Err(err) = &res {
                            tracing::error!(error = %err, "Turn failed");
                        }

                        worker_tx.send(Event::TurnCompleted(res))?;
                        return Ok(());
                    });

                    worker = Some((Work::Turn, handle));
                }
            }
        }

        return Ok(());
    }
}
