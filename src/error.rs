//! Error types for the wellness coach.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Chat session errors.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Failed to persist turn for user {user_id}: {source}")]
    PersistFailed {
        user_id: String,
        #[source]
        source: DatabaseError,
    },
}
