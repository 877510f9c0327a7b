use std::net::TcpListener;
use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use test_utils::research_events_fixture;
use tokio::sync::mpsc;

use super::help_text;
use super::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::MessageType;
use crate::domain::models::OrchestratorBox;
use crate::domain::models::TurnError;
use crate::domain::models::TurnRequest;
use crate::infrastructure::orchestrators::agent_server::AgentServer;

fn start_service(
    url: &str,
) -> (
    mpsc::UnboundedSender<Action>,
    mpsc::UnboundedReceiver<Event>,
) {
    let orchestrator: OrchestratorBox = Box::new(AgentServer::new(
        url,
        "multi_tool_agent",
        "2000",
        "200",
    ));
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    tokio::spawn(async move {
        return ActionsService::start(Arc::new(orchestrator), event_tx, &mut action_rx).await;
    });

    return (action_tx, event_rx);
}

/// A server that accepts connections and never answers.
fn silent_server() -> Result<(TcpListener, String)> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let url = format!("http://{}", listener.local_addr()?);

    return Ok((listener, url));
}

fn turn_request() -> TurnRequest {
    return TurnRequest {
        user_id: "user-1".to_string(),
        session_id: "session-1".to_string(),
        text: "Is solar worth it?".to_string(),
    };
}

#[test]
fn it_lists_every_slash_command_in_help() {
    let text = help_text();
    for command in ["/new", "/copy", "/quit", "/help"] {
        assert!(text.contains(command), "{command} is missing");
    }
}

#[tokio::test]
async fn it_creates_sessions() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock(
            "POST",
            mockito::Matcher::Regex(r"^/apps/multi_tool_agent/users/user-1/sessions/".to_string()),
        )
        .with_status(200)
        .create_async()
        .await;

    let (tx, mut rx) = start_service(&server.url());
    tx.send(Action::CreateSession("user-1".to_string()))?;

    match rx.recv().await {
        Some(Event::SessionCreated(Ok(session_id))) => {
            assert!(session_id.starts_with("session-"))
        }
        _ => bail!("Wrong enum"),
    }
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_runs_turns() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/run")
        .with_status(200)
        .with_body(research_events_fixture())
        .create_async()
        .await;

    let (tx, mut rx) = start_service(&server.url());
    tx.send(Action::RunTurn(turn_request()))?;

    match rx.recv().await {
        Some(Event::TurnCompleted(Ok(text))) => {
            assert!(text.ends_with("Final Evaluation: Approved"))
        }
        _ => bail!("Wrong enum"),
    }
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_reports_failed_turns() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/run")
        .with_status(500)
        .with_body(r#"{"detail": "Model overloaded"}"#)
        .create_async()
        .await;

    let (tx, mut rx) = start_service(&server.url());
    tx.send(Action::RunTurn(turn_request()))?;

    match rx.recv().await {
        Some(Event::TurnCompleted(Err(err))) => {
            assert_eq!(err.to_string(), "Error 500: Model overloaded")
        }
        _ => bail!("Wrong enum"),
    }
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_ignores_aborts_without_work() -> Result<()> {
    let (tx, mut rx) = start_service("http://127.0.0.1:9");
    tx.send(Action::Abort())?;
    drop(tx);

    assert!(rx.recv().await.is_none());

    return Ok(());
}

#[tokio::test]
async fn it_aborts_running_turns() -> Result<()> {
    let (_listener, url) = silent_server()?;
    let (tx, mut rx) = start_service(&url);
    tx.send(Action::RunTurn(turn_request()))?;
    tx.send(Action::Abort())?;

    match rx.recv().await {
        Some(Event::TurnCompleted(Err(err))) => assert_eq!(err, TurnError::Aborted),
        _ => bail!("Wrong enum"),
    }

    drop(tx);
    assert!(rx.recv().await.is_none());

    return Ok(());
}

#[tokio::test]
async fn it_aborts_session_creation() -> Result<()> {
    let (_listener, url) = silent_server()?;
    let (tx, mut rx) = start_service(&url);
    tx.send(Action::CreateSession("user-1".to_string()))?;
    tx.send(Action::Abort())?;

    match rx.recv().await {
        Some(Event::SessionCreated(Err(err))) => assert_eq!(err, TurnError::Aborted),
        _ => bail!("Wrong enum"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_reports_clipboard_failures_as_notices() -> Result<()> {
    let (tx, mut rx) = start_service("http://127.0.0.1:9");
    tx.send(Action::CopyMessages(vec![]))?;

    match rx.recv().await {
        Some(Event::Notice(message)) => {
            assert_eq!(message.message_type(), MessageType::Error)
        }
        _ => bail!("Wrong enum"),
    }

    return Ok(());
}
