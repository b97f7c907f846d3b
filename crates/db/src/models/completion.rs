//! Session completion model.

use lms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `session_completions` table.
///
/// `verdict` holds the serialized verdict that granted the completion.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionCompletion {
    pub id: DbId,
    pub user_id: DbId,
    pub session_id: DbId,
    pub watched_percentage: i32,
    pub checkpoint_score: i32,
    pub verdict: serde_json::Value,
    pub completed_at: Timestamp,
}
