//! In-state game event log
//!
//! An append-only, human-readable record of everything that happened in a
//! game. It is part of GameState and serializes with it, so a restored
//! snapshot carries its full history.

use serde::{Deserialize, Serialize};

/// Verbosity levels for log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum VerbosityLevel {
    /// Turn and phase boundaries, plays, tussles, victories
    #[default]
    Normal,
    /// Every individual stat change and checker pass
    Verbose,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
}

/// Append-only event log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameLog {
    entries: Vec<LogEntry>,
}

impl GameLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a normal-level event.
    pub fn event(&mut self, message: impl Into<String>) {
        self.entries.push(LogEntry {
            level: VerbosityLevel::Normal,
            message: message.into(),
        });
    }

    /// Append a verbose-level detail.
    pub fn detail(&mut self, message: impl Into<String>) {
        self.entries.push(LogEntry {
            level: VerbosityLevel::Verbose,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Iterate messages at or below a verbosity threshold.
    pub fn messages_at(&self, level: VerbosityLevel) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |e| e.level <= level)
            .map(|e| e.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_append_only_and_filtered() {
        let mut log = GameLog::new();
        log.event("turn 1 begins");
        log.detail("checker pass: no change");
        log.event("Ember Whelp played");

        assert_eq!(log.len(), 3);
        let normal: Vec<&str> = log.messages_at(VerbosityLevel::Normal).collect();
        assert_eq!(normal, vec!["turn 1 begins", "Ember Whelp played"]);
        let verbose: Vec<&str> = log.messages_at(VerbosityLevel::Verbose).collect();
        assert_eq!(verbose.len(), 3);
    }
}
