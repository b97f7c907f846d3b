//! Handlers for watch progress storage, validation and completion.
//!
//! The server never trusts a client-computed verdict. Validation always
//! reloads the caller's persisted logs and recomputes from them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lms_core::types::DbId;
use lms_core::watch::records::ProgressLog;
use lms_core::watch::validator::{self, ProgressVerdict};
use lms_db::repositories::{CompletionRepo, ProgressLogRepo};
use lms_db::DbPool;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::sessions::{find_session, resolve_session};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Optional target user; only admins may name someone other than themselves.
#[derive(Debug, Default, Deserialize)]
pub struct ProgressQuery {
    pub user_id: Option<DbId>,
}

/// Reload a user's logs and run the validator over them.
async fn verdict_for(pool: &DbPool, session_id: DbId, user_id: DbId) -> AppResult<ProgressVerdict> {
    let (_, video_duration) = resolve_session(pool, session_id).await?;
    let log = ProgressLogRepo::load(pool, session_id, user_id).await?;
    let verdict = validator::validate_progress(video_duration, &log)?;

    tracing::info!(
        session_id,
        user_id,
        is_valid = verdict.is_valid,
        watched_percentage = verdict.watched_percentage,
        checkpoint_score = verdict.checkpoint_score,
        suspicious_jumps = verdict.suspicious_jumps,
        has_reached_end = verdict.has_reached_end,
        "Validated watch progress"
    );
    Ok(verdict)
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions/{id}/progress
///
/// Append a tracker flush for the caller. Rows are stored as sent; bad
/// values are dealt with at validation time.
pub async fn save_progress(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    Json(log): Json<ProgressLog>,
) -> AppResult<impl IntoResponse> {
    find_session(&state.pool, session_id).await?;

    let summary = ProgressLogRepo::save(&state.pool, session_id, auth.user_id, &log).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: summary })))
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /api/v1/sessions/{id}/progress
pub async fn get_progress(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    Query(query): Query<ProgressQuery>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth.target_user(query.user_id)?;
    find_session(&state.pool, session_id).await?;

    let log = ProgressLogRepo::load(&state.pool, session_id, user_id).await?;

    Ok(Json(DataResponse { data: log }))
}

// ---------------------------------------------------------------------------
// Validate
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions/{id}/progress/validate
///
/// Compute the authoritative verdict without recording anything.
pub async fn validate_progress(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    Query(query): Query<ProgressQuery>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth.target_user(query.user_id)?;
    let verdict = verdict_for(&state.pool, session_id, user_id).await?;

    Ok(Json(DataResponse { data: verdict }))
}

// ---------------------------------------------------------------------------
// Complete
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions/{id}/complete
///
/// Record a completion for the caller if, and only if, their stored logs
/// validate. Every call re-validates; a repeat that passes refreshes the
/// stored verdict but keeps the original `completed_at`.
pub async fn complete_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let verdict = verdict_for(&state.pool, session_id, auth.user_id).await?;
    if !verdict.is_valid {
        return Err(AppError::IncompleteProgress(Box::new(verdict)));
    }

    let completion = CompletionRepo::record(&state.pool, session_id, auth.user_id, &verdict).await?;
    tracing::info!(
        session_id,
        user_id = auth.user_id,
        completion_id = completion.id,
        "Session completed"
    );

    Ok(Json(DataResponse { data: completion }))
}
