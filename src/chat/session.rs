//! One user's conversation with the coach.
//!
//! A turn runs in this order:
//! 1. Trim the input; blank input is ignored.
//! 2. Append the user's message to the transcript.
//! 3. Compute the reply with the `ResponseSelector`.
//! 4. Append the reply.
//! 5. Persist the chat row, then award points for the turn.
//! 6. If either write fails, log it and append an apology entry. The computed
//!    reply stays in the transcript.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::transcript::{Transcript, TranscriptEntry};
use crate::coach::{self, ResponseSelector, Topic, replies};
use crate::config::{CoachConfig, DEFAULT_HISTORY_LIMIT};
use crate::error::ChatError;
use crate::profile::Profile;
use crate::store::Database;

/// Points awarded for each persisted chat turn.
pub const CHAT_POINTS: i64 = 2;

/// Source label recorded on chat point awards.
pub const CHAT_POINTS_SOURCE: &str = "ai_chat";

/// Description recorded on chat point awards.
pub const CHAT_POINTS_DESCRIPTION: &str = "AI chat interaction";

/// Per-session tuning, usually taken from `CoachConfig`.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub history_limit: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl From<&CoachConfig> for SessionOptions {
    fn from(config: &CoachConfig) -> Self {
        Self {
            history_limit: config.history_limit,
        }
    }
}

/// What a submitted turn produced.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub topic: Topic,
    pub response: String,
    /// False when the chat row or the point award could not be written.
    pub persisted: bool,
    /// Entries this turn appended, in order.
    pub entries: Vec<TranscriptEntry>,
}

/// A single user's chat session.
pub struct ChatSession {
    profile: Profile,
    transcript: Transcript,
    selector: Arc<ResponseSelector>,
    db: Arc<dyn Database>,
    options: SessionOptions,
}

impl ChatSession {
    /// Start a session: replay recent history, or greet with the welcome message.
    ///
    /// A failed history load is logged and treated as an empty history.
    pub async fn start(
        db: Arc<dyn Database>,
        selector: Arc<ResponseSelector>,
        profile: Profile,
        options: SessionOptions,
    ) -> Self {
        let rows = match db
            .recent_chat_messages(&profile.id, options.history_limit)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!(user_id = %profile.id, error = %e, "Failed to load chat history");
                Vec::new()
            }
        };

        let transcript = if rows.is_empty() {
            let mut transcript = Transcript::new();
            transcript.push(TranscriptEntry::assistant(coach::compose(&profile)));
            debug!(user_id = %profile.id, "No chat history, seeded welcome message");
            transcript
        } else {
            debug!(user_id = %profile.id, rows = rows.len(), "Replaying chat history");
            Transcript::from_history(rows.into_iter().rev())
        };

        Self {
            profile,
            transcript,
            selector,
            db,
            options,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Process one user message. Returns `None` for blank input.
    pub async fn submit(&mut self, input: &str) -> Option<TurnOutcome> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }

        let start = self.transcript.len();
        self.transcript.push(TranscriptEntry::user(message));

        let reply = self.selector.reply(message, &self.profile);
        self.transcript
            .push(TranscriptEntry::assistant(reply.text.clone()));

        let persisted = match self.persist(message, &reply.text).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Chat turn not persisted");
                self.transcript
                    .push(TranscriptEntry::assistant(replies::APOLOGY));
                false
            }
        };

        info!(
            user_id = %self.profile.id,
            topic = %reply.topic,
            persisted = persisted,
            "Chat turn processed"
        );

        Some(TurnOutcome {
            topic: reply.topic,
            response: reply.text,
            persisted,
            entries: self.transcript.entries()[start..].to_vec(),
        })
    }

    async fn persist(&self, message: &str, response: &str) -> Result<(), ChatError> {
        let user_id = &self.profile.id;
        let wrap = |source| ChatError::PersistFailed {
            user_id: user_id.clone(),
            source,
        };

        self.db
            .insert_chat_message(user_id, message, response)
            .await
            .map_err(wrap)?;
        self.db
            .award_points(
                user_id,
                CHAT_POINTS,
                CHAT_POINTS_SOURCE,
                CHAT_POINTS_DESCRIPTION,
            )
            .await
            .map_err(wrap)?;
        Ok(())
    }
}
