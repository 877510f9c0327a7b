#[cfg(test)]
#[path = "turn_error_test.rs"]
mod tests;

use serde_json::Value;

/// Failures of a single user turn. All of them are caught at the turn
/// boundary and shown to the user; none of them add to the session history.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("Failed to create session: {0}")]
    SessionCreation(String),
    #[error("Error {status}: {detail}")]
    Request { status: u16, detail: String },
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Error decoding response: {0}")]
    Parse(String),
    #[error("Could not extract assistant message from response")]
    ExtractionEmpty,
    #[error("No active session. Please create a session first.")]
    NoSession,
    #[error("Request aborted.")]
    Aborted,
}

impl TurnError {
    /// Builds a request error from a non-success response, preferring the
    /// `detail` field of a JSON error body over the raw body.
    pub fn from_response_body(status: u16, body: &str) -> TurnError {
        let detail = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(obj)) => match obj.get("detail") {
                Some(Value::String(detail)) => detail.to_string(),
                Some(detail) => detail.to_string(),
                None => body.to_string(),
            },
            _ => body.to_string(),
        };

        return TurnError::Request { status, detail };
    }
}

impl From<reqwest::Error> for TurnError {
    fn from(err: reqwest::Error) -> TurnError {
        if err.is_decode() {
            return TurnError::Parse(err.to_string());
        }

        return TurnError::Transport(err.to_string());
    }
}
