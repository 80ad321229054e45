//! In-memory chat transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::ChatMessage;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One line of the conversation as shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
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

/// Ordered conversation for one session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand stored rows (oldest first) into entries.
    ///
    /// Each row yields the user's message and, when present, the stored reply,
    /// both stamped with the row's creation time.
    pub fn from_history(rows: impl IntoIterator<Item = ChatMessage>) -> Self {
        let mut entries = Vec::new();
        for row in rows {
            entries.push(TranscriptEntry {
                role: Role::User,
                content: row.message,
                timestamp: row.created_at,
            });
            if !row.response.is_empty() {
                entries.push(TranscriptEntry {
                    role: Role::Assistant,
                    content: row.response,
                    timestamp: row.created_at,
                });
            }
        }
        Self { entries }
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use uuid::Uuid;

    use super::*;

    fn row(message: &str, response: &str, minutes_ago: i64) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            message: message.into(),
            response: response.into(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn history_expands_to_pairs() {
        let rows = vec![row("hi", "hello!", 5), row("workout?", "Push day", 1)];
        let transcript = Transcript::from_history(rows.clone());
        let roles: Vec<Role> = transcript.entries().iter().map(|e| e.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
        assert_eq!(transcript.entries()[2].content, "workout?");
        assert_eq!(transcript.entries()[3].timestamp, rows[1].created_at);
    }

    #[test]
    fn empty_response_yields_only_user_entry() {
        let transcript = Transcript::from_history(vec![row("seeded", "", 3)]);
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.entries()[0].role, Role::User);
    }

    #[test]
    fn role_serializes_snake_case() {
        let entry = TranscriptEntry::assistant("hey");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hey");
    }
}
