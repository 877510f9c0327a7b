#[cfg(test)]
#[path = "clipboard_test.rs"]
mod tests;

use anyhow::anyhow;
use anyhow::Result;
use once_cell::sync::OnceCell;
use tokio::sync::mpsc;

use crate::domain::models::Message;

static SENDER: OnceCell<mpsc::UnboundedSender<String>> = OnceCell::new();

/// Formats messages for the clipboard. A single message is copied as is,
/// a conversation gets author prefixes.
pub fn format_messages(messages: &[Message]) -> String {
    if messages.len() == 1 {
        return messages[0].text.to_string();
    }

    return messages
        .iter()
        .map(|message| {
            return format!("{}: {}", message.author, message.text);
        })
        .collect::<Vec<String>>()
        .join("\n\n");
}

/// Owns the system clipboard on its own task, as some platforms drop the
/// contents when the handle that set them goes away.
pub struct ClipboardService {}

impl ClipboardService {
    pub async fn start() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        if SENDER.set(tx).is_err() {
            return Err(anyhow!("Clipboard service is already running."));
        }

        let mut clipboard = arboard::Clipboard::new()?;

        while let Some(text) = rx.recv().await {
            clipboard.set_text(text)?;
        }

        return Ok(());
    }

    pub fn healthcheck() -> Result<()> {
        if SENDER.get().is_some() {
            return Ok(());
        }

        arboard::Clipboard::new()?;
        return Ok(());
    }

    pub fn set(text: String) -> Result<()> {
        if let Some(tx) = SENDER.get() {
            tx.send(text)?;
            return Ok(());
        }

        return Err(anyhow!("Clipboard service is not initialized."));
    }
}
