use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Message;

/// A conversation as saved to disk after each completed turn.
#[derive(Serialize, Deserialize)]
pub struct Transcript {
    pub id: String,
    pub user_id: String,
    pub app_name: String,
    pub version: String,
    pub timestamp: String,
    pub messages: Vec<Message>,
}
