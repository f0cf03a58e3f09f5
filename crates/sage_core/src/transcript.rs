use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One message of a conversation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered, append-only conversation history for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// The most recent user turn, i.e. the message currently being answered.
    pub fn latest_user(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.role == Role::User)
    }

    /// The user turn before the latest one, skipping assistant replies.
    pub fn previous_user(&self) -> Option<&Turn> {
        self.turns
            .iter()
            .rev()
            .filter(|t| t.role == Role::User)
            .nth(1)
    }
}

impl From<Vec<Turn>> for Transcript {
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut t = Transcript::new();
        t.push(Turn::user("one"));
        t.push(Turn::assistant("two"));
        t.push(Turn::user("three"));
        let contents: Vec<_> = t.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_previous_user_skips_assistant() {
        let t = Transcript::from(vec![
            Turn::user("what is water"),
            Turn::assistant("Water is H2O"),
            Turn::user("yes"),
        ]);
        assert_eq!(t.latest_user().unwrap().content, "yes");
        assert_eq!(t.previous_user().unwrap().content, "what is water");
    }

    #[test]
    fn test_previous_user_missing() {
        let t = Transcript::from(vec![Turn::user("yes")]);
        assert!(t.previous_user().is_none());
        assert!(Transcript::new().latest_user().is_none());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
