pub mod health;
pub mod sessions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /sessions/{id}                         session metadata
/// /sessions/{id}/progress                store (POST) or read (GET) watch logs
/// /sessions/{id}/progress/validate       authoritative verdict (POST)
/// /sessions/{id}/complete                validate and record completion (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/sessions", sessions::router())
}
