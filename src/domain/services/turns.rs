#[cfg(test)]
#[path = "turns_test.rs"]
mod tests;

use super::reconstruct;
use crate::domain::models::single_response_text;
use crate::domain::models::OrchestratorBox;
use crate::domain::models::RunResponse;
use crate::domain::models::SessionIdStyle;
use crate::domain::models::TurnError;
use crate::domain::models::TurnRequest;

/// Creates a remote session for the user and returns its id. The caller
/// binds it to the local session only on success.
pub async fn open_session(
    orchestrator: &OrchestratorBox,
    user_id: &str,
    style: SessionIdStyle,
) -> Result<String, TurnError> {
    let session_id = style.create_id();
    orchestrator.create_session(user_id, &session_id).await?;
    tracing::debug!(user_id, session_id = %session_id, "Session created");

    return Ok(session_id);
}

/// Sends one user message and turns whatever the service answers with into
/// the assistant's reply.
pub async fn run_turn(
    orchestrator: &OrchestratorBox,
    request: &TurnRequest,
) -> Result<String, TurnError> {
    let response = orchestrator.run(request).await?;

    let reply = match &response {
        RunResponse::Events(events) => {
            tracing::debug!(events = events.len(), "Reconstructing reply");
            reconstruct(events)
        }
        RunResponse::Single(value) => single_response_text(value),
    };

    return reply.ok_or(TurnError::ExtractionEmpty);
}
