//! libSQL-backed storage for profiles, chat history and points.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::{ChatMessage, Database, PointAward};

use std::sync::Arc;

use crate::config::StoreLocation;
use crate::error::DatabaseError;

/// Open the store described by the config.
pub async fn open(location: &StoreLocation) -> Result<Arc<dyn Database>, DatabaseError> {
    let backend = match location {
        StoreLocation::Local(path) => LibSqlBackend::new_local(path).await?,
        StoreLocation::Remote { url, auth_token } => {
            LibSqlBackend::new_remote(url, auth_token).await?
        }
    };
    Ok(Arc::new(backend))
}
