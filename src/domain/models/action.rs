use super::Message;
use super::TurnRequest;

pub enum Action {
    Abort(),
    CopyMessages(Vec<Message>),
    CreateSession(String),
    RunTurn(TurnRequest),
}
