//! Repository for the `session_completions` table.

use lms_core::types::DbId;
use lms_core::watch::validator::ProgressVerdict;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::completion::SessionCompletion;

/// Column list for `session_completions` queries.
const COLUMNS: &str = "\
    id, user_id, session_id, watched_percentage, checkpoint_score, \
    verdict, completed_at";

/// Provides access to granted completions.
pub struct CompletionRepo;

impl CompletionRepo {
    /// Record a completion backed by `verdict`.
    ///
    /// Re-completing a session refreshes the stored verdict but keeps the
    /// original `completed_at`.
    pub async fn record(
        pool: &PgPool,
        session_id: DbId,
        user_id: DbId,
        verdict: &ProgressVerdict,
    ) -> Result<SessionCompletion, sqlx::Error> {
        let query = format!(
            "INSERT INTO session_completions \
                 (user_id, session_id, watched_percentage, checkpoint_score, verdict) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, session_id) DO UPDATE SET \
                 watched_percentage = EXCLUDED.watched_percentage, \
                 checkpoint_score   = EXCLUDED.checkpoint_score, \
                 verdict            = EXCLUDED.verdict \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionCompletion>(&query)
            .bind(user_id)
            .bind(session_id)
            .bind(verdict.watched_percentage as i32)
            .bind(verdict.checkpoint_score as i32)
            .bind(Json(verdict))
            .fetch_one(pool)
            .await
    }

    /// Find the completion of a session by a user, if granted.
    pub async fn find(
        pool: &PgPool,
        session_id: DbId,
        user_id: DbId,
    ) -> Result<Option<SessionCompletion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM session_completions \
             WHERE session_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, SessionCompletion>(&query)
            .bind(session_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
