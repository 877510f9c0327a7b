#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use uuid::Uuid;

use super::Author;
use super::Message;
use super::TurnError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionIdStyle {
    Timestamp,
    Uuid,
}

impl SessionIdStyle {
    pub fn parse(text: &str) -> Option<SessionIdStyle> {
        return SessionIdStyle::iter().find(|e| return e.to_string() == text);
    }

    pub fn create_id(&self) -> String {
        match self {
            SessionIdStyle::Timestamp => {
                let secs = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|duration| return duration.as_secs())
                    .unwrap_or_default();

                return format!("session-{secs}");
            }
            SessionIdStyle::Uuid => return format!("session-{}", Uuid::new_v4()),
        }
    }
}

/// Everything needed to send one user message to the orchestration service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnRequest {
    pub user_id: String,
    pub session_id: String,
    pub text: String,
}

/// The client's view of a conversation. The remote service owns every piece
/// of agent state; this only tracks identifiers and what was said.
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: String,
    pub session_id: Option<String>,
    pub history: Vec<Message>,
}

impl Default for Session {
    fn default() -> Session {
        return Session::new(format!("user-{}", Uuid::new_v4()));
    }
}

impl Session {
    pub fn new(user_id: String) -> Session {
        return Session {
            user_id,
            session_id: None,
            history: vec![],
        };
    }

    pub fn is_active(&self) -> bool {
        return self.session_id.is_some();
    }

    /// Binds a freshly created remote session. Prior history is discarded,
    /// the user id is kept.
    pub fn activate(&mut self, session_id: &str) {
        self.session_id = Some(session_id.to_string());
        self.history.clear();
    }

    /// Records the user's message and returns the request to send. The
    /// message stays in history even if the turn later fails.
    pub fn begin_turn(&mut self, text: &str) -> Result<TurnRequest, TurnError> {
        let session_id = match &self.session_id {
            Some(session_id) => session_id.to_string(),
            None => return Err(TurnError::NoSession),
        };

        self.history.push(Message::new(Author::User, text));

        return Ok(TurnRequest {
            user_id: self.user_id.to_string(),
            session_id,
            text: text.to_string(),
        });
    }

    pub fn complete_turn(&mut self, result: &Result<String, TurnError>) {
        if let Ok(text) = result {
            self.history.push(Message::new(Author::Assistant, text));
        }
    }
}
