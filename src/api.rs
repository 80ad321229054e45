//! REST endpoints for chat, dashboard and profile.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Timelike, Utc};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use crate::chat::{ChatSession, SessionOptions};
use crate::coach::ResponseSelector;
use crate::dashboard;
use crate::profile::Profile;
use crate::store::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub selector: Arc<ResponseSelector>,
    pub options: SessionOptions,
}

/// Build the Axum router with all REST routes.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/users/{user_id}/profile",
            get(get_profile).put(put_profile),
        )
        .route("/api/users/{user_id}/chat", get(get_chat).post(post_chat))
        .route("/api/users/{user_id}/dashboard", get(get_dashboard))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "wellness-coach",
    }))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Load a profile or produce the 404/500 response for the handler to return.
async fn load_profile(state: &AppState, user_id: &str) -> Result<Profile, Response> {
    match state.db.get_profile(user_id).await {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Err(error_response(StatusCode::NOT_FOUND, "Profile not found")),
        Err(e) => {
            warn!(user_id = user_id, error = %e, "Profile lookup failed");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Profile lookup failed",
            ))
        }
    }
}

async fn get_profile(State(state): State<AppState>, Path(user_id): Path<String>) -> Response {
    match load_profile(&state, &user_id).await {
        Ok(profile) => Json(profile).into_response(),
        Err(resp) => resp,
    }
}

async fn put_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(mut profile): Json<Profile>,
) -> Response {
    profile.id = user_id;
    match state.db.upsert_profile(&profile).await {
        Ok(()) => Json(profile).into_response(),
        Err(e) => {
            warn!(user_id = %profile.id, error = %e, "Profile upsert failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Profile update failed")
        }
    }
}

async fn get_chat(State(state): State<AppState>, Path(user_id): Path<String>) -> Response {
    let profile = match load_profile(&state, &user_id).await {
        Ok(profile) => profile,
        Err(resp) => return resp,
    };
    let session = ChatSession::start(
        Arc::clone(&state.db),
        Arc::clone(&state.selector),
        profile,
        state.options,
    )
    .await;
    Json(serde_json::json!({ "entries": session.transcript().entries() })).into_response()
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
}

async fn post_chat(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<ChatRequest>,
) -> Response {
    if body.message.trim().is_empty() {
        debug!(user_id = %user_id, "Ignoring blank chat message");
        return StatusCode::NO_CONTENT.into_response();
    }
    let profile = match load_profile(&state, &user_id).await {
        Ok(profile) => profile,
        Err(resp) => return resp,
    };
    let mut session = ChatSession::start(
        Arc::clone(&state.db),
        Arc::clone(&state.selector),
        profile,
        state.options,
    )
    .await;
    match session.submit(&body.message).await {
        Some(outcome) => Json(outcome).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[derive(Deserialize)]
struct DashboardQuery {
    /// Caller's local hour (0-23); defaults to the server's UTC hour.
    hour: Option<u32>,
}

async fn get_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let profile = match load_profile(&state, &user_id).await {
        Ok(profile) => profile,
        Err(resp) => return resp,
    };
    let now = Utc::now();
    let now = query
        .hour
        .filter(|h| *h < 24)
        .and_then(|h| now.with_hour(h))
        .unwrap_or(now);
    match dashboard::summarize(state.db.as_ref(), &profile, now).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "Dashboard summary failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Dashboard unavailable")
        }
    }
}
