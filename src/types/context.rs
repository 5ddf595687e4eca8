//! Narrative context: the data bag threaded through every state

use crate::error::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Driving distance every fresh context starts with
pub const INITIAL_DISTANCE: i64 = 500;

/// A directional input used by the QTE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "ArrowUp")]
    Up,
    #[serde(rename = "ArrowDown")]
    Down,
    #[serde(rename = "ArrowLeft")]
    Left,
    #[serde(rename = "ArrowRight")]
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Key name as reported by a browser keyboard event
    pub fn key_name(self) -> &'static str {
        match self {
            Direction::Up => "ArrowUp",
            Direction::Down => "ArrowDown",
            Direction::Left => "ArrowLeft",
            Direction::Right => "ArrowRight",
        }
    }

    /// Arrow glyph shown in the QTE overlay
    pub fn symbol(self) -> char {
        match self {
            Direction::Up => '↑',
            Direction::Down => '↓',
            Direction::Left => '←',
            Direction::Right => '→',
        }
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    /// Accepts browser key names plus the terminal aliases `up`/`w`,
    /// `down`/`s`, `left`/`a` and `right`/`d`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ArrowUp" | "up" | "u" | "↑" => Ok(Direction::Up),
            "ArrowDown" | "down" | "d" | "↓" => Ok(Direction::Down),
            "ArrowLeft" | "left" | "l" | "←" => Ok(Direction::Left),
            "ArrowRight" | "right" | "r" | "→" => Ok(Direction::Right),
            other => Err(EngineError::UnknownKey(other.to_string())),
        }
    }
}

/// One entry in the append-only audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

/// Ephemeral hint for the mobile collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Mutable narrative data. Only the machine mutates it; everybody else
/// observes published snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeContext {
    /// Current dialogue, may contain `{{var}}` placeholders
    pub current_text: String,
    pub background_image: Option<String>,
    pub character_image: Option<String>,
    pub qte_sequence: Vec<Direction>,
    pub qte_progress: usize,
    pub driving_distance: i64,
    pub has_spaghetti: bool,
    pub game_cleared: bool,
    pub logs: Vec<LogEntry>,
    pub notification: Option<Notification>,
    pub email: String,
}

impl Default for NarrativeContext {
    fn default() -> Self {
        Self {
            current_text: String::new(),
            background_image: None,
            character_image: None,
            qte_sequence: Vec::new(),
            qte_progress: 0,
            driving_distance: INITIAL_DISTANCE,
            has_spaghetti: false,
            game_cleared: false,
            logs: Vec::new(),
            notification: None,
            email: String::new(),
        }
    }
}

impl NarrativeContext {
    /// Append a log entry. Timestamps never go backwards even if the clock does.
    pub fn push_log(&mut self, timestamp: DateTime<Utc>, text: impl Into<String>) {
        let timestamp = match self.logs.last() {
            Some(last) if last.timestamp > timestamp => last.timestamp,
            _ => timestamp,
        };
        self.logs.push(LogEntry {
            timestamp,
            text: text.into(),
        });
    }

    /// Whether every QTE input has been entered
    pub fn qte_complete(&self) -> bool {
        !self.qte_sequence.is_empty() && self.qte_progress >= self.qte_sequence.len()
    }

    /// Next expected QTE direction, if any remain
    pub fn qte_expected(&self) -> Option<Direction> {
        self.qte_sequence.get(self.qte_progress).copied()
    }

    /// Look up a context field by its serialized (camelCase) name and
    /// stringify it for text interpolation
    pub fn var(&self, name: &str) -> Option<String> {
        let value = serde_json::to_value(self).ok()?;
        value.get(name).map(stringify)
    }
}

fn stringify(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(stringify)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fresh_context_defaults() {
        let ctx = NarrativeContext::default();
        assert_eq!(ctx.driving_distance, 500);
        assert!(!ctx.has_spaghetti);
        assert!(!ctx.game_cleared);
        assert!(ctx.logs.is_empty());
        assert!(ctx.notification.is_none());
    }

    #[test]
    fn var_resolves_camel_case_fields() {
        let mut ctx = NarrativeContext::default();
        ctx.driving_distance = 120;
        ctx.email = "cat@oiia.dev".to_string();
        ctx.qte_sequence = vec![Direction::Up, Direction::Left];

        assert_eq!(ctx.var("drivingDistance"), Some("120".to_string()));
        assert_eq!(ctx.var("email"), Some("cat@oiia.dev".to_string()));
        assert_eq!(ctx.var("hasSpaghetti"), Some("false".to_string()));
        assert_eq!(ctx.var("qteSequence"), Some("ArrowUp,ArrowLeft".to_string()));
        assert_eq!(ctx.var("notification"), Some("null".to_string()));
        assert_eq!(ctx.var("missing"), None);
    }

    #[test]
    fn log_timestamps_are_monotonic() {
        let mut ctx = NarrativeContext::default();
        let later = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 5).unwrap();
        let earlier = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();

        ctx.push_log(later, "first");
        ctx.push_log(earlier, "second");

        assert_eq!(ctx.logs.len(), 2);
        assert_eq!(ctx.logs[1].text, "second");
        assert!(ctx.logs[1].timestamp >= ctx.logs[0].timestamp);
    }

    #[test]
    fn direction_parses_key_names_and_aliases() {
        assert_eq!("ArrowUp".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("l".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!("d".parse::<Direction>().unwrap(), Direction::Down);
        assert!("w".parse::<Direction>().is_err());
        assert_eq!(" right ".parse::<Direction>().unwrap(), Direction::Right);
        assert!("Enter".parse::<Direction>().is_err());
    }

    #[test]
    fn qte_completion_requires_non_empty_sequence() {
        let mut ctx = NarrativeContext::default();
        assert!(!ctx.qte_complete());

        ctx.qte_sequence = vec![Direction::Down];
        assert_eq!(ctx.qte_expected(), Some(Direction::Down));
        ctx.qte_progress = 1;
        assert!(ctx.qte_complete());
        assert_eq!(ctx.qte_expected(), None);
    }
}
