//! libSQL implementation of the `Database` trait.
//!
//! Supports local file, in-memory and remote (sqld / Turso) databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::profile::{Gender, Profile};
use crate::store::migrations;
use crate::store::traits::{ChatMessage, Database, PointAward};

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_database(db)?;
        backend.init_schema().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Connect to a remote libSQL server and run migrations.
    pub async fn new_remote(url: &str, auth_token: &SecretString) -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_remote(url.to_string(), auth_token.expose_secret().to_string())
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to connect to {url}: {e}")))?;

        let backend = Self::from_database(db)?;
        backend.init_schema().await?;
        info!(url = url, "Remote database connected");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let backend = Self::from_database(db)?;
        backend.init_schema().await?;
        Ok(backend)
    }

    fn from_database(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    /// Get the connection.
    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Canonical write format. Fixed width, so string order is time order.
fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

/// Convert `Option<&str>` to libsql Value.
fn opt_text(s: Option<&str>) -> libsql::Value {
    match s {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}

fn opt_real(v: Option<f64>) -> libsql::Value {
    match v {
        Some(v) => libsql::Value::Real(v),
        None => libsql::Value::Null,
    }
}

fn opt_integer(v: Option<i64>) -> libsql::Value {
    match v {
        Some(v) => libsql::Value::Integer(v),
        None => libsql::Value::Null,
    }
}

/// Map a libsql Row to a Profile.
///
/// Column order matches PROFILE_COLUMNS.
fn row_to_profile(row: &libsql::Row) -> Result<Profile, libsql::Error> {
    let gender: Option<String> = row.get(2).ok();
    let completed: i64 = row.get(8).unwrap_or(0);
    Ok(Profile {
        id: row.get(0)?,
        full_name: row.get(1).ok(),
        gender: gender.and_then(|g| g.parse::<Gender>().ok()),
        fitness_goal: row.get(3).ok(),
        bmi: row.get(4).ok(),
        total_points: row.get(5).ok(),
        profession: row.get(6).ok(),
        activity_level: row.get(7).ok(),
        profile_completed: completed != 0,
    })
}

/// Map a libsql Row to a ChatMessage.
///
/// Column order matches CHAT_COLUMNS.
fn row_to_chat(row: &libsql::Row) -> Result<ChatMessage, libsql::Error> {
    let id_str: String = row.get(0)?;
    let created_str: String = row.get(4)?;
    Ok(ChatMessage {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::nil()),
        user_id: row.get(1)?,
        message: row.get(2)?,
        response: row.get(3).unwrap_or_default(),
        created_at: parse_datetime(&created_str),
    })
}

/// Map a libsql Row to a PointAward.
///
/// Column order matches POINT_COLUMNS.
fn row_to_award(row: &libsql::Row) -> Result<PointAward, libsql::Error> {
    let id_str: String = row.get(0)?;
    let created_str: String = row.get(5)?;
    Ok(PointAward {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::nil()),
        user_id: row.get(1)?,
        points: row.get(2)?,
        source: row.get(3)?,
        description: row.get(4).unwrap_or_default(),
        created_at: parse_datetime(&created_str),
    })
}

// ── Trait implementation ────────────────────────────────────────────

const PROFILE_COLUMNS: &str = "id, full_name, gender, fitness_goal, bmi, total_points, profession, activity_level, profile_completed";

const CHAT_COLUMNS: &str = "id, user_id, message, response, created_at";

const POINT_COLUMNS: &str = "id, user_id, points, source, description, created_at";

#[async_trait]
impl Database for LibSqlBackend {
    async fn init_schema(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    // ── Profiles ────────────────────────────────────────────────────

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"),
                params![user_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_profile: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let profile = row_to_profile(&row)
                    .map_err(|e| DatabaseError::Query(format!("row parse: {e}")))?;
                Ok(Some(profile))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_profile: {e}"))),
        }
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), DatabaseError> {
        let conn = self.conn();
        let now = format_datetime(Utc::now());
        let gender = profile.gender.map(|g| g.to_string());
        conn.execute(
            "INSERT INTO profiles (id, full_name, gender, fitness_goal, bmi, total_points,
                profession, activity_level, profile_completed, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT (id) DO UPDATE SET
                full_name = excluded.full_name,
                gender = excluded.gender,
                fitness_goal = excluded.fitness_goal,
                bmi = excluded.bmi,
                total_points = excluded.total_points,
                profession = excluded.profession,
                activity_level = excluded.activity_level,
                profile_completed = excluded.profile_completed,
                updated_at = excluded.updated_at",
            params![
                profile.id.as_str(),
                opt_text(profile.full_name.as_deref()),
                opt_text(gender.as_deref()),
                opt_text(profile.fitness_goal.as_deref()),
                opt_real(profile.bmi),
                opt_integer(profile.total_points),
                opt_text(profile.profession.as_deref()),
                opt_text(profile.activity_level.as_deref()),
                profile.profile_completed as i64,
                now,
            ],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("upsert_profile: {e}")))?;

        debug!(user_id = %profile.id, "Profile upserted");
        Ok(())
    }

    // ── Chat history ────────────────────────────────────────────────

    async fn insert_chat_message(
        &self,
        user_id: &str,
        message: &str,
        response: &str,
    ) -> Result<ChatMessage, DatabaseError> {
        let row = ChatMessage {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            message: message.to_string(),
            response: response.to_string(),
            created_at: Utc::now(),
        };
        let conn = self.conn();
        conn.execute(
            "INSERT INTO chat_messages (id, user_id, message, response, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                row.id.to_string(),
                user_id,
                message,
                response,
                format_datetime(row.created_at),
            ],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("insert_chat_message: {e}")))?;

        debug!(id = %row.id, user_id = user_id, "Chat message inserted");
        Ok(row)
    }

    async fn recent_chat_messages(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {CHAT_COLUMNS} FROM chat_messages WHERE user_id = ?1
                     ORDER BY created_at DESC, rowid DESC LIMIT ?2"
                ),
                params![user_id, i64::try_from(limit).unwrap_or(i64::MAX)],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("recent_chat_messages: {e}")))?;

        let mut messages = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            match row_to_chat(&row) {
                Ok(msg) => messages.push(msg),
                Err(e) => {
                    tracing::warn!("Skipping chat row: {e}");
                }
            }
        }
        Ok(messages)
    }

    // ── Points ──────────────────────────────────────────────────────

    async fn award_points(
        &self,
        user_id: &str,
        points: i64,
        source: &str,
        description: &str,
    ) -> Result<PointAward, DatabaseError> {
        let award = PointAward {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            points,
            source: source.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        // The award row and the profile total commit together or not at all.
        let tx = self
            .conn()
            .transaction()
            .await
            .map_err(|e| DatabaseError::Query(format!("award_points begin: {e}")))?;

        let written = async {
            tx.execute(
                "INSERT INTO user_points (id, user_id, points, source, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    award.id.to_string(),
                    user_id,
                    points,
                    source,
                    description,
                    format_datetime(award.created_at),
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("award_points: {e}")))?;

            // No profile row is fine.
            tx.execute(
                "UPDATE profiles SET total_points = COALESCE(total_points, 0) + ?2 WHERE id = ?1",
                params![user_id, points],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("award_points total: {e}")))?;
            Ok::<(), DatabaseError>(())
        }
        .await;

        if let Err(e) = written {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!("award_points rollback failed: {rollback}");
            }
            return Err(e);
        }
        tx.commit()
            .await
            .map_err(|e| DatabaseError::Query(format!("award_points commit: {e}")))?;

        debug!(user_id = user_id, points = points, source = source, "Points awarded");
        Ok(award)
    }

    async fn list_point_awards(&self, user_id: &str) -> Result<Vec<PointAward>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {POINT_COLUMNS} FROM user_points WHERE user_id = ?1
                     ORDER BY created_at ASC, rowid ASC"
                ),
                params![user_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_point_awards: {e}")))?;

        let mut awards = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            match row_to_award(&row) {
                Ok(award) => awards.push(award),
                Err(e) => {
                    tracing::warn!("Skipping point row: {e}");
                }
            }
        }
        Ok(awards)
    }

    async fn points_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT COALESCE(SUM(points), 0) FROM user_points
                 WHERE user_id = ?1 AND created_at >= ?2",
                params![user_id, format_datetime(since)],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("points_since: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => row
                .get::<i64>(0)
                .map_err(|e| DatabaseError::Query(format!("points_since parse: {e}"))),
            Ok(None) => Ok(0),
            Err(e) => Err(DatabaseError::Query(format!("points_since: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    async fn test_db() -> LibSqlBackend {
        LibSqlBackend::new_memory().await.unwrap()
    }

    fn alex() -> Profile {
        Profile::new("alex")
            .with_name("Alex Smith")
            .with_gender(Gender::Male)
            .with_goal("muscle_building")
            .with_bmi(27.0)
    }

    // ── Profile tests ───────────────────────────────────────────────

    #[tokio::test]
    async fn profile_roundtrip() {
        let db = test_db().await;
        let mut profile = alex().with_profession("Student");
        profile.activity_level = Some("moderate".into());
        profile.profile_completed = true;
        db.upsert_profile(&profile).await.unwrap();

        let loaded = db.get_profile("alex").await.unwrap().unwrap();
        assert_eq!(loaded, profile);
    }

    #[tokio::test]
    async fn profile_not_found() {
        let db = test_db().await;
        assert!(db.get_profile("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn profile_upsert_replaces() {
        let db = test_db().await;
        db.upsert_profile(&alex()).await.unwrap();
        db.upsert_profile(&Profile::new("alex").with_name("Alexandra"))
            .await
            .unwrap();

        let loaded = db.get_profile("alex").await.unwrap().unwrap();
        assert_eq!(loaded.full_name.as_deref(), Some("Alexandra"));
        assert_eq!(loaded.gender, None);
        assert_eq!(loaded.bmi, None);
    }

    // ── Chat tests ──────────────────────────────────────────────────

    #[tokio::test]
    async fn chat_insert_and_list() {
        let db = test_db().await;
        let inserted = db
            .insert_chat_message("alex", "any workout tips?", "Push day...")
            .await
            .unwrap();

        let rows = db.recent_chat_messages("alex", 20).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, inserted.id);
        assert_eq!(rows[0].message, "any workout tips?");
        assert_eq!(rows[0].response, "Push day...");
    }

    #[tokio::test]
    async fn recent_chat_is_newest_first_and_limited() {
        let db = test_db().await;
        for i in 0..25 {
            db.insert_chat_message("alex", &format!("msg {i}"), "ok")
                .await
                .unwrap();
        }
        db.insert_chat_message("sam", "other user", "ok").await.unwrap();

        let rows = db.recent_chat_messages("alex", 20).await.unwrap();
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].message, "msg 24");
        assert_eq!(rows[19].message, "msg 5");
        assert!(rows.iter().all(|r| r.user_id == "alex"));
    }

    #[tokio::test]
    async fn oversized_limit_returns_everything() {
        let db = test_db().await;
        for i in 0..3 {
            db.insert_chat_message("alex", &format!("msg {i}"), "ok")
                .await
                .unwrap();
        }
        let rows = db.recent_chat_messages("alex", usize::MAX).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].message, "msg 2");
    }

    #[tokio::test]
    async fn empty_response_is_kept() {
        let db = test_db().await;
        db.insert_chat_message("alex", "seeded", "").await.unwrap();
        let rows = db.recent_chat_messages("alex", 20).await.unwrap();
        assert_eq!(rows[0].response, "");
    }

    // ── Points tests ────────────────────────────────────────────────

    #[tokio::test]
    async fn award_points_updates_total() {
        let db = test_db().await;
        db.upsert_profile(&alex().with_points(10)).await.unwrap();

        let award = db
            .award_points("alex", 2, "ai_chat", "AI chat interaction")
            .await
            .unwrap();
        assert_eq!(award.points, 2);
        assert_eq!(award.source, "ai_chat");

        let profile = db.get_profile("alex").await.unwrap().unwrap();
        assert_eq!(profile.total_points, Some(12));

        let awards = db.list_point_awards("alex").await.unwrap();
        assert_eq!(awards.len(), 1);
        assert_eq!(awards[0].description, "AI chat interaction");
    }

    #[tokio::test]
    async fn award_points_without_profile() {
        let db = test_db().await;
        db.award_points("ghost", 2, "ai_chat", "AI chat interaction")
            .await
            .unwrap();
        assert_eq!(db.list_point_awards("ghost").await.unwrap().len(), 1);
        assert!(db.get_profile("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_total_update_rolls_back_award() {
        let db = test_db().await;
        db.conn().execute("DROP TABLE profiles", ()).await.unwrap();

        let result = db
            .award_points("alex", 2, "ai_chat", "AI chat interaction")
            .await;
        assert!(matches!(result, Err(DatabaseError::Query(ref m)) if m.starts_with("award_points total")));
        assert!(db.list_point_awards("alex").await.unwrap().is_empty());

        // The connection is usable again after the rollback.
        db.insert_chat_message("alex", "hello", "hi").await.unwrap();
        assert_eq!(db.recent_chat_messages("alex", 20).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn points_since_excludes_old_awards() {
        let db = test_db().await;
        db.award_points("alex", 2, "ai_chat", "recent").await.unwrap();
        db.award_points("alex", 5, "workout", "recent").await.unwrap();

        let old = format_datetime(Utc::now() - Duration::days(10));
        db.conn()
            .execute(
                "INSERT INTO user_points (id, user_id, points, source, description, created_at)
                 VALUES (?1, 'alex', 100, 'legacy', 'old', ?2)",
                params![Uuid::new_v4().to_string(), old],
            )
            .await
            .unwrap();

        let week_ago = Utc::now() - Duration::days(7);
        assert_eq!(db.points_since("alex", week_ago).await.unwrap(), 7);
        assert_eq!(db.points_since("sam", week_ago).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn local_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("coach.db");
        {
            let db = LibSqlBackend::new_local(&path).await.unwrap();
            db.upsert_profile(&alex()).await.unwrap();
        }
        let db = LibSqlBackend::new_local(&path).await.unwrap();
        assert!(db.get_profile("alex").await.unwrap().is_some());
    }
}
