#[cfg(test)]
#[path = "agent_server_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Orchestrator;
use crate::domain::models::RunResponse;
use crate::domain::models::TurnError;
use crate::domain::models::TurnRequest;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct NewMessage {
    role: String,
    parts: Vec<Part>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunRequest {
    app_name: String,
    user_id: String,
    session_id: String,
    new_message: NewMessage,
    streaming: bool,
}

/// Client for an agent API server hosting the research pipeline.
pub struct AgentServer {
    url: String,
    app_name: String,
    request_timeout: String,
    health_check_timeout: String,
}

impl Default for AgentServer {
    fn default() -> AgentServer {
        return AgentServer::new(
            &Config::get(ConfigKey::ServerURL),
            &Config::get(ConfigKey::AppName),
            &Config::get(ConfigKey::RequestTimeout),
            &Config::get(ConfigKey::HealthCheckTimeout),
        );
    }
}

impl AgentServer {
    pub fn new(
        url: &str,
        app_name: &str,
        request_timeout: &str,
        health_check_timeout: &str,
    ) -> AgentServer {
        return AgentServer {
            url: url.trim_end_matches('/').to_string(),
            app_name: app_name.to_string(),
            request_timeout: request_timeout.to_string(),
            health_check_timeout: health_check_timeout.to_string(),
        };
    }

    /// Applies the configured request timeout. Zero leaves requests
    /// unbounded.
    fn with_timeout(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.request_timeout.parse::<u64>() {
            Ok(millis) if millis > 0 => return req.timeout(Duration::from_millis(millis)),
            _ => return req,
        }
    }
}

#[async_trait]
impl Orchestrator for AgentServer {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("Agent server URL is not defined");
        }

        let res = reqwest::Client::new()
            .get(format!("{url}/list-apps", url = self.url))
            .timeout(Duration::from_millis(
                self.health_check_timeout.parse::<u64>()?,
            ))
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Agent server is not reachable");
                bail!("Agent server is not reachable at {}", self.url);
            }
        };

        let status = res.status().as_u16();
        if status >= 400 {
            tracing::error!(status = status, "Agent server health check failed");
            bail!("Agent server health check failed with status {status}");
        }

        let apps = res.json::<Vec<String>>().await?;
        if !apps.contains(&self.app_name) {
            bail!(format!(
                "Agent server does not serve app {app_name}. Available apps: {apps}",
                app_name = self.app_name,
                apps = apps.join(", ")
            ));
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn create_session(&self, user_id: &str, session_id: &str) -> Result<(), TurnError> {
        let res = self
            .with_timeout(reqwest::Client::new().post(format!(
                "{url}/apps/{app_name}/users/{user_id}/sessions/{session_id}",
                url = self.url,
                app_name = self.app_name,
            )))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|err| return TurnError::SessionCreation(err.to_string()))?;

        if res.status().as_u16() != 200 {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            tracing::error!(status = status, body = %body, "Failed to create session");
            return Err(TurnError::SessionCreation(body));
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn run(&self, request: &TurnRequest) -> Result<RunResponse, TurnError> {
        let req = RunRequest {
            app_name: self.app_name.to_string(),
            user_id: request.user_id.to_string(),
            session_id: request.session_id.to_string(),
            new_message: NewMessage {
                role: "user".to_string(),
                parts: vec![Part {
                    text: request.text.to_string(),
                }],
            },
            streaming: true,
        };

        let res = self
            .with_timeout(reqwest::Client::new().post(format!("{url}/run", url = self.url)))
            .json(&req)
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.text().await?;

        if status != 200 {
            tracing::error!(status = status, body = %body, "Run request failed");
            return Err(TurnError::from_response_body(status, &body));
        }

        tracing::debug!(body = %body, "Run response");
        return RunResponse::parse(&body);
    }
}
