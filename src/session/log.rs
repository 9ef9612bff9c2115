//! Navigation log: the append-only audit trail shown to the user.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who wrote a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogSource {
    System,
    Analyzer,
    Quiz,
}

impl std::fmt::Display for LogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "SYSTEM"),
            Self::Analyzer => write!(f, "ANALYZER"),
            Self::Quiz => write!(f, "QUIZ"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Position in the log, starting at 0.
    pub seq: usize,
    pub timestamp: DateTime<Utc>,
    /// Wall-clock display form of `timestamp`, `HH:MM:SS`.
    pub clock: String,
    pub source: LogSource,
    pub message: String,
}

/// Ordered entries; insertion order is chronological. Never shrinks.
#[derive(Debug, Clone, Default)]
pub struct NavigationLog {
    entries: Vec<LogEntry>,
}

impl NavigationLog {
    pub fn append(&mut self, source: LogSource, message: impl Into<String>) -> &LogEntry {
        self.append_at(Utc::now(), source, message)
    }

    /// Append with an explicit timestamp, held back to the previous entry's
    /// time if the clock went backwards.
    pub fn append_at(
        &mut self,
        at: DateTime<Utc>,
        source: LogSource,
        message: impl Into<String>,
    ) -> &LogEntry {
        let timestamp = match self.entries.last() {
            Some(prev) if prev.timestamp > at => prev.timestamp,
            _ => at,
        };
        let seq = self.entries.len();
        self.entries.push(LogEntry {
            seq,
            timestamp,
            clock: timestamp.format("%H:%M:%S").to_string(),
            source,
            message: message.into(),
        });
        &self.entries[seq]
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries with `seq >= from`.
    pub fn since(&self, from: usize) -> &[LogEntry] {
        self.entries.get(from..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
