mod action;
mod author;
mod event;
mod loading;
mod message;
mod orchestrator;
mod response_event;
mod run_response;
mod session;
mod slash_commands;
mod textarea;
mod transcript;
mod turn_error;

pub use action::*;
pub use author::*;
pub use event::*;
pub use loading::*;
pub use message::*;
pub use orchestrator::*;
pub use response_event::*;
pub use run_response::*;
pub use session::*;
pub use slash_commands::*;
pub use textarea::*;
pub use transcript::*;
pub use turn_error::*;
