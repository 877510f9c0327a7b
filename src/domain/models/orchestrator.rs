use anyhow::Result;
use async_trait::async_trait;

use super::RunResponse;
use super::TurnError;
use super::TurnRequest;

#[async_trait]
pub trait Orchestrator {
    /// Used at startup to verify the orchestration service is reachable and
    /// serves the configured app.
    async fn health_check(&self) -> Result<()>;

    /// Registers a new remote session for the user. Agent state for the
    /// session lives entirely on the service.
    async fn create_session(&self, user_id: &str, session_id: &str) -> Result<(), TurnError>;

    /// Sends one user message and waits for the whole pipeline run to
    /// finish. The service answers with either a list of events or, for
    /// non-streaming deployments, a single message object.
    async fn run(&self, request: &TurnRequest) -> Result<RunResponse, TurnError>;
}

pub type OrchestratorBox = Box<dyn Orchestrator + Send + Sync>;
