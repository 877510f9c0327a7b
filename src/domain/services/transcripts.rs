#[cfg(test)]
#[path = "transcripts_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use chrono::DateTime;
use chrono::Local;
use chrono::SecondsFormat;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::Session;
use crate::domain::models::Transcript;

/// Local copies of finished conversations. The remote service keeps its own
/// session state; these exist so past research can be read offline.
pub struct Transcripts {
    pub cache_dir: path::PathBuf,
}

impl Default for Transcripts {
    fn default() -> Transcripts {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("scribe/sessions");

        return Transcripts::new(cache_dir);
    }
}

impl Transcripts {
    pub fn new(cache_dir: path::PathBuf) -> Transcripts {
        return Transcripts { cache_dir };
    }

    fn get_file_path(&self, id: &str) -> path::PathBuf {
        return self.cache_dir.join(format!("{id}.yaml"));
    }

    /// Returns all transcripts oldest first, each trimmed down to its first
    /// user message to save on memory.
    pub async fn list(&self) -> Result<Vec<Transcript>> {
        let mut transcripts: Vec<Transcript> = vec![];
        if !self.cache_dir.exists() {
            return Ok(transcripts);
        }

        let mut dir = fs::read_dir(&self.cache_dir).await?;
        while let Some(file) = dir.next_entry().await? {
            let payload = fs::read_to_string(file.path()).await?;
            let mut transcript: Transcript = serde_yaml::from_str(&payload)?;
            transcript.messages = transcript
                .messages
                .into_iter()
                .filter(|e| return e.author == Author::User)
                .take(1)
                .collect::<Vec<Message>>();

            transcripts.push(transcript);
        }

        transcripts.sort_by_cached_key(|transcript| {
            return DateTime::parse_from_rfc3339(&transcript.timestamp).ok();
        });

        return Ok(transcripts);
    }

    pub async fn load(&self, id: &str) -> Result<Transcript> {
        let file_path = self.get_file_path(id);
        if !file_path.exists() {
            bail!(format!("No session found for id {id}"));
        }

        let payload = fs::read_to_string(file_path).await?;
        let transcript: Transcript = serde_yaml::from_str(&payload)?;

        return Ok(transcript);
    }

    pub async fn save(&self, session: &Session) -> Result<()> {
        let id = match &session.session_id {
            Some(id) => id,
            None => bail!("Cannot save a transcript without an active session"),
        };

        let transcript = Transcript {
            id: id.to_string(),
            user_id: session.user_id.to_string(),
            app_name: Config::get(ConfigKey::AppName),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            messages: session
                .history
                .iter()
                .filter(|message| return message.is_turn())
                .cloned()
                .collect(),
        };

        let payload = serde_yaml::to_string(&transcript)?;

        if !self.cache_dir.exists() {
            fs::create_dir_all(&self.cache_dir).await?;
        }

        let mut file = fs::File::create(self.get_file_path(id)).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let file_path = self.get_file_path(id);
        if !file_path.exists() {
            return Ok(());
        }

        fs::remove_file(file_path).await?;
        return Ok(());
    }

    pub async fn delete_all(&self) -> Result<()> {
        if !self.cache_dir.exists() {
            return Ok(());
        }

        fs::remove_dir_all(&self.cache_dir).await?;
        return Ok(());
    }
}
