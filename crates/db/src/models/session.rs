//! Catalog session model.

use lms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Session {
    pub id: DbId,
    pub title: String,
    /// Nominal video length in seconds; `None` until the video is processed.
    pub video_duration_secs: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a session.
#[derive(Debug, Deserialize)]
pub struct CreateSession {
    pub title: String,
    pub video_duration_secs: Option<f64>,
}
