//! Route definitions for course sessions and their watch progress.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{progress, sessions};
use crate::state::AppState;

/// Routes mounted under `/sessions`.
///
/// ```text
/// GET    /{id}                      -> get_session
/// GET    /{id}/progress             -> get_progress
/// POST   /{id}/progress             -> save_progress
/// POST   /{id}/progress/validate    -> validate_progress
/// POST   /{id}/complete             -> complete_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(sessions::get_session))
        .route(
            "/{id}/progress",
            get(progress::get_progress).post(progress::save_progress),
        )
        .route("/{id}/progress/validate", post(progress::validate_progress))
        .route("/{id}/complete", post(progress::complete_session))
}
