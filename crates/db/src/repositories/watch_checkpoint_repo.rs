//! Repository for the `watch_checkpoints` table.
//!
//! Reached checkpoints are write-once per `(user, session, time)`: a later
//! record for the same checkpoint never overwrites the first.

use lms_core::types::{DbId, Timestamp};
use lms_core::watch::records::CheckpointRecord;
use sqlx::PgConnection;

use crate::models::watch::WatchCheckpointRow;

/// Column list for `watch_checkpoints` queries.
const COLUMNS: &str = "id, user_id, session_id, checkpoint_time, is_natural, reached_at";

/// Write-once access to reached checkpoints.
pub struct WatchCheckpointRepo;

impl WatchCheckpointRepo {
    /// Record reached checkpoints, ignoring ones already recorded.
    ///
    /// Returns the number of checkpoints newly recorded.
    pub async fn insert_many(
        conn: &mut PgConnection,
        session_id: DbId,
        user_id: DbId,
        records: &[CheckpointRecord],
    ) -> Result<u64, sqlx::Error> {
        if records.is_empty() {
            return Ok(0);
        }

        let times: Vec<f64> = records.iter().map(|r| r.checkpoint_time).collect();
        let natural: Vec<bool> = records.iter().map(|r| r.is_natural).collect();
        let reached_at: Vec<Timestamp> = records.iter().map(|r| r.reached_at).collect();

        let result = sqlx::query(
            "INSERT INTO watch_checkpoints \
                 (user_id, session_id, checkpoint_time, is_natural, reached_at) \
             SELECT $1, $2, c.checkpoint_time, c.is_natural, c.reached_at \
             FROM UNNEST($3::FLOAT8[], $4::BOOLEAN[], $5::TIMESTAMPTZ[]) \
                 WITH ORDINALITY AS c(checkpoint_time, is_natural, reached_at, ord) \
             ORDER BY c.ord \
             ON CONFLICT (user_id, session_id, checkpoint_time) DO NOTHING",
        )
        .bind(user_id)
        .bind(session_id)
        .bind(&times)
        .bind(&natural)
        .bind(&reached_at)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// List a user's reached checkpoints for a session in insertion order.
    pub async fn list_for_user(
        conn: &mut PgConnection,
        session_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<WatchCheckpointRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM watch_checkpoints \
             WHERE session_id = $1 AND user_id = $2 \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, WatchCheckpointRow>(&query)
            .bind(session_id)
            .bind(user_id)
            .fetch_all(conn)
            .await
    }
}
