//! Handlers for course session lookups.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use lms_core::error::CoreError;
use lms_core::types::DbId;
use lms_db::models::completion::SessionCompletion;
use lms_db::models::session::Session;
use lms_db::repositories::{CompletionRepo, SessionRepo};
use lms_db::DbPool;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a session or fail with 404.
pub async fn find_session(pool: &DbPool, session_id: DbId) -> AppResult<Session> {
    SessionRepo::find_by_id(pool, session_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        }))
}

/// Load a session together with a duration usable for validation.
///
/// A session whose video length is unknown, zero, or not a number cannot be
/// validated against; that is reported as 422 rather than silently
/// treated as complete or incomplete.
pub async fn resolve_session(pool: &DbPool, session_id: DbId) -> AppResult<(Session, f64)> {
    let session = find_session(pool, session_id).await?;
    match session.video_duration_secs {
        Some(d) if d.is_finite() && d > 0.0 => Ok((session, d)),
        other => {
            let reason = match other {
                None => "video duration is not known".to_string(),
                Some(d) => format!("video duration {d} is not usable"),
            };
            tracing::warn!(session_id, %reason, "Session duration unresolvable");
            Err(AppError::Core(CoreError::Unresolvable {
                entity: "Session",
                id: session_id,
                reason,
            }))
        }
    }
}

/// Session metadata plus the caller's completion, if any.
#[derive(Debug, Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: Session,
    pub completion: Option<SessionCompletion>,
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state.pool, session_id).await?;
    let completion = CompletionRepo::find(&state.pool, session_id, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: SessionDetail {
            session,
            completion,
        },
    }))
}
