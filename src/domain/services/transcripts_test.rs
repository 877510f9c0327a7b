use std::path;

use anyhow::Result;

use super::Transcripts;
use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Session;

fn temp_cache_dir() -> path::PathBuf {
    return std::env::temp_dir().join(format!("scribe-test-{}", uuid::Uuid::new_v4()));
}

fn research_session(session_id: &str) -> Session {
    let mut session = Session::new("user-1".to_string());
    session.activate(session_id);
    session.history = vec![
        Message::new(Author::User, "Is solar worth it?"),
        Message::new(Author::Assistant, "Final Evaluation: Approved"),
        Message::new(Author::User, "What about wind?"),
        Message::new_with_type(Author::Scribe, MessageType::Error, "Request aborted."),
    ];

    return session;
}

#[tokio::test]
async fn it_saves_and_loads_transcripts() -> Result<()> {
    let transcripts = Transcripts::new(temp_cache_dir());
    transcripts.save(&research_session("session-1")).await?;

    let transcript = transcripts.load("session-1").await?;
    assert_eq!(transcript.id, "session-1");
    assert_eq!(transcript.user_id, "user-1");
    assert_eq!(transcript.messages.len(), 3);
    assert_eq!(transcript.messages[1].text, "Final Evaluation: Approved");

    transcripts.delete_all().await?;
    return Ok(());
}

#[tokio::test]
async fn it_refuses_to_save_inactive_sessions() {
    let transcripts = Transcripts::new(temp_cache_dir());
    let res = transcripts.save(&Session::new("user-1".to_string())).await;

    assert!(res.is_err());
    assert!(!transcripts.cache_dir.exists());
}

#[tokio::test]
async fn it_lists_transcripts_with_their_first_question() -> Result<()> {
    let transcripts = Transcripts::new(temp_cache_dir());
    transcripts.save(&research_session("session-1")).await?;
    transcripts.save(&research_session("session-2")).await?;

    let list = transcripts.list().await?;
    assert_eq!(list.len(), 2);
    for transcript in list {
        assert_eq!(transcript.messages.len(), 1);
        assert_eq!(transcript.messages[0].text, "Is solar worth it?");
    }

    transcripts.delete_all().await?;
    return Ok(());
}

#[tokio::test]
async fn it_lists_nothing_without_a_cache_dir() -> Result<()> {
    let transcripts = Transcripts::new(temp_cache_dir());
    assert!(transcripts.list().await?.is_empty());

    return Ok(());
}

#[tokio::test]
async fn it_deletes_transcripts() -> Result<()> {
    let transcripts = Transcripts::new(temp_cache_dir());
    transcripts.save(&research_session("session-1")).await?;
    transcripts.delete("session-1").await?;

    assert!(transcripts.load("session-1").await.is_err());
    transcripts.delete("session-1").await?;

    transcripts.delete_all().await?;
    return Ok(());
}
