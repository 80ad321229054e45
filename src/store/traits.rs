//! Single async interface for all coach persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::profile::Profile;

/// One persisted chat turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub user_id: String,
    pub message: String,
    /// Empty for seeded rows that never got a reply.
    pub response: String,
    pub created_at: DateTime<Utc>,
}

/// One persisted point award.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointAward {
    pub id: Uuid,
    pub user_id: String,
    pub points: i64,
    pub source: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Backend-agnostic database trait covering profiles, chat history and points.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn init_schema(&self) -> Result<(), DatabaseError>;

    // ── Profiles ────────────────────────────────────────────────────

    /// Snapshot of a user's profile.
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, DatabaseError>;

    /// Insert or replace a profile.
    async fn upsert_profile(&self, profile: &Profile) -> Result<(), DatabaseError>;

    // ── Chat history ────────────────────────────────────────────────

    /// Append one chat row.
    async fn insert_chat_message(
        &self,
        user_id: &str,
        message: &str,
        response: &str,
    ) -> Result<ChatMessage, DatabaseError>;

    /// Most recent chat rows for a user, newest first, up to `limit`.
    async fn recent_chat_messages(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, DatabaseError>;

    // ── Points ──────────────────────────────────────────────────────

    /// Record a point award and add it to the profile's running total.
    async fn award_points(
        &self,
        user_id: &str,
        points: i64,
        source: &str,
        description: &str,
    ) -> Result<PointAward, DatabaseError>;

    /// All awards for a user, oldest first.
    async fn list_point_awards(&self, user_id: &str) -> Result<Vec<PointAward>, DatabaseError>;

    /// Sum of a user's awards created at or after `since`.
    async fn points_since(&self, user_id: &str, since: DateTime<Utc>)
    -> Result<i64, DatabaseError>;
}
