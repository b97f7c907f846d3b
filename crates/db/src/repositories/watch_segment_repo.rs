//! Repository for the `watch_segments` table.

use lms_core::types::DbId;
use lms_core::watch::records::WatchSegment;
use sqlx::PgConnection;

use crate::models::watch::WatchSegmentRow;

/// Column list for `watch_segments` queries.
const COLUMNS: &str = "\
    id, user_id, session_id, start_time, end_time, \
    duration, weight, created_at";

/// Append-only access to watch segments.
pub struct WatchSegmentRepo;

impl WatchSegmentRepo {
    /// Append `segments` for a user and session in one statement.
    ///
    /// Returns the number of rows inserted.
    pub async fn insert_many(
        conn: &mut PgConnection,
        session_id: DbId,
        user_id: DbId,
        segments: &[WatchSegment],
    ) -> Result<u64, sqlx::Error> {
        if segments.is_empty() {
            return Ok(0);
        }

        let starts: Vec<f64> = segments.iter().map(|s| s.start_time).collect();
        let ends: Vec<f64> = segments.iter().map(|s| s.end_time).collect();
        let durations: Vec<f64> = segments.iter().map(|s| s.duration).collect();
        let weights: Vec<f64> = segments.iter().map(|s| s.weight).collect();

        let result = sqlx::query(
            "INSERT INTO watch_segments \
                 (user_id, session_id, start_time, end_time, duration, weight) \
             SELECT $1, $2, s.start_time, s.end_time, s.duration, s.weight \
             FROM UNNEST($3::FLOAT8[], $4::FLOAT8[], $5::FLOAT8[], $6::FLOAT8[]) \
                 WITH ORDINALITY AS s(start_time, end_time, duration, weight, ord) \
             ORDER BY s.ord",
        )
        .bind(user_id)
        .bind(session_id)
        .bind(&starts)
        .bind(&ends)
        .bind(&durations)
        .bind(&weights)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// List a user's segments for a session in insertion order.
    pub async fn list_for_user(
        conn: &mut PgConnection,
        session_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<WatchSegmentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM watch_segments \
             WHERE session_id = $1 AND user_id = $2 \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, WatchSegmentRow>(&query)
            .bind(session_id)
            .bind(user_id)
            .fetch_all(conn)
            .await
    }
}
