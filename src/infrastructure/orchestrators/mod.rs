pub mod agent_server;

use crate::domain::models::OrchestratorBox;

pub struct OrchestratorManager {}

impl OrchestratorManager {
    pub fn get() -> OrchestratorBox {
        return Box::<agent_server::AgentServer>::default();
    }
}
