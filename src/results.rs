use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use minesweeper_common::models::GameRecord;
use tracing::debug;

/// Receives one record per won game.
pub trait ResultSink: Send {
    fn record(&mut self, record: &GameRecord) -> io::Result<()>;
}

impl ResultSink for Vec<GameRecord> {
    fn record(&mut self, record: &GameRecord) -> io::Result<()> {
        self.push(*record);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultFormat {
    /// `8x8: 42 s (10 mines)`
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for ResultFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown results format: {other}")),
        }
    }
}

impl ResultFormat {
    pub fn line(self, record: &GameRecord) -> io::Result<String> {
        match self {
            Self::Text => Ok(format!(
                "{}x{}: {} s ({} mines)\n",
                record.width, record.height, record.elapsed_seconds, record.mines
            )),
            Self::Json => {
                let mut line = serde_json::to_string(record)?;
                line.push('\n');
                Ok(line)
            }
        }
    }
}

/// Appends each record as one line to a file, creating it on first use.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    format: ResultFormat,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>, format: ResultFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for FileSink {
    fn record(&mut self, record: &GameRecord) -> io::Result<()> {
        let line = self.format.line(record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        debug!("Appended result to {}", self.path.display());
        Ok(())
    }
}
