use tui_textarea::Input;

use super::Message;
use super::TurnError;

pub enum Event {
    Notice(Message),
    SessionCreated(Result<String, TurnError>),
    TurnCompleted(Result<String, TurnError>),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLN(),
    KeyboardEnter(),
    KeyboardPaste(String),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
