pub mod actions;
mod app_state;
mod bubble;
mod bubble_list;
pub mod clipboard;
pub mod events;
mod reconstructor;
mod scroll;
mod transcripts;
mod turns;

pub use app_state::*;
pub use bubble::*;
pub use bubble_list::*;
pub use reconstructor::*;
pub use scroll::*;
pub use transcripts::*;
pub use turns::*;
