use super::Session;
use super::SessionIdStyle;
use crate::domain::models::Author;
use crate::domain::models::TurnError;

#[test]
fn it_generates_a_user_id() {
    let session = Session::default();
    assert!(session.user_id.starts_with("user-"));
    assert!(!session.is_active());
    assert!(session.history.is_empty());
}

#[test]
fn it_rejects_turns_without_a_session() {
    let mut session = Session::new("user-1".to_string());
    let res = session.begin_turn("Hello?");

    assert_eq!(res, Err(TurnError::NoSession));
    assert!(session.history.is_empty());
}

#[test]
fn it_begins_turns() {
    let mut session = Session::new("user-1".to_string());
    session.activate("session-1");
    let req = session.begin_turn("What is solar?").unwrap();

    assert_eq!(req.user_id, "user-1");
    assert_eq!(req.session_id, "session-1");
    assert_eq!(req.text, "What is solar?");
    assert_eq!(session.history.len(), 1);
    assert_eq!(session.history[0].author, Author::User);
}

#[test]
fn it_completes_successful_turns() {
    let mut session = Session::new("user-1".to_string());
    session.activate("session-1");
    session.begin_turn("What is solar?").unwrap();
    session.complete_turn(&Ok("Energy from the sun.".to_string()));

    assert_eq!(session.history.len(), 2);
    assert_eq!(session.history[1].author, Author::Assistant);
    assert_eq!(session.history[1].text, "Energy from the sun.");
}

#[test]
fn it_keeps_only_the_user_message_on_failure() {
    let mut session = Session::new("user-1".to_string());
    session.activate("session-1");
    session.begin_turn("What is solar?").unwrap();
    session.complete_turn(&Err(TurnError::ExtractionEmpty));

    assert_eq!(session.session_id, Some("session-1".to_string()));
    assert_eq!(session.history.len(), 1);
    assert_eq!(session.history[0].author, Author::User);
}

#[test]
fn it_clears_history_but_keeps_the_user_on_new_sessions() {
    let mut session = Session::new("user-1".to_string());
    session.activate("session-1");
    session.begin_turn("What is solar?").unwrap();
    session.activate("session-2");

    assert_eq!(session.user_id, "user-1");
    assert_eq!(session.session_id, Some("session-2".to_string()));
    assert!(session.history.is_empty());
}

#[test]
fn it_creates_session_ids() {
    let timestamp_id = SessionIdStyle::Timestamp.create_id();
    assert!(timestamp_id.starts_with("session-"));
    assert!(timestamp_id["session-".len()..].parse::<u64>().is_ok());

    let uuid_id = SessionIdStyle::Uuid.create_id();
    assert!(uuid_id.starts_with("session-"));
    assert_eq!(uuid_id.len(), "session-".len() + 36);
    assert_ne!(uuid_id, SessionIdStyle::Uuid.create_id());
}

#[test]
fn it_parses_session_id_styles() {
    assert_eq!(SessionIdStyle::parse("timestamp"), Some(SessionIdStyle::Timestamp));
    assert_eq!(SessionIdStyle::parse("uuid"), Some(SessionIdStyle::Uuid));
    assert_eq!(SessionIdStyle::parse("other"), None);
}
