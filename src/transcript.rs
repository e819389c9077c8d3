use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn format_entry(timestamp: &str, user_text: &str, ai_text: &str) -> String {
    format!("{timestamp} - User: {user_text}\nAI: {ai_text}\n\n")
}

fn format_session_start(timestamp: &str) -> String {
    format!("{timestamp} - Chat started\n")
}

/// Append-only chat transcript. Entries are never read back.
#[derive(Debug, Clone)]
pub struct TranscriptLogger {
    path: PathBuf,
}

impl TranscriptLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, user_text: &str, ai_text: &str) -> io::Result<()> {
        self.write(&format_entry(&timestamp_now(), user_text, ai_text))
    }

    pub fn append_session_start(&self) -> io::Result<()> {
        self.write(&format_session_start(&timestamp_now()))
    }

    fn write(&self, entry: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())?;
        debug!(
            path = %self.path.display(),
            entry_len = entry.len(),
            "appended transcript entry"
        );
        Ok(())
    }
}
