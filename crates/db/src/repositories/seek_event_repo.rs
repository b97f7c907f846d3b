//! Repository for the `seek_events` table.

use lms_core::types::{DbId, Timestamp};
use lms_core::watch::records::SeekEvent;
use sqlx::PgConnection;

use crate::models::watch::SeekEventRow;

/// Column list for `seek_events` queries.
const COLUMNS: &str = "id, user_id, session_id, from_time, to_time, jump_amount, occurred_at";

/// Append-only access to seek events.
pub struct SeekEventRepo;

impl SeekEventRepo {
    /// Append `seeks` for a user and session in one statement.
    ///
    /// Returns the number of rows inserted.
    pub async fn insert_many(
        conn: &mut PgConnection,
        session_id: DbId,
        user_id: DbId,
        seeks: &[SeekEvent],
    ) -> Result<u64, sqlx::Error> {
        if seeks.is_empty() {
            return Ok(0);
        }

        let from: Vec<f64> = seeks.iter().map(|s| s.from_time).collect();
        let to: Vec<f64> = seeks.iter().map(|s| s.to_time).collect();
        let jumps: Vec<f64> = seeks.iter().map(|s| s.jump_amount).collect();
        let occurred_at: Vec<Timestamp> = seeks.iter().map(|s| s.timestamp).collect();

        let result = sqlx::query(
            "INSERT INTO seek_events \
                 (user_id, session_id, from_time, to_time, jump_amount, occurred_at) \
             SELECT $1, $2, e.from_time, e.to_time, e.jump_amount, e.occurred_at \
             FROM UNNEST($3::FLOAT8[], $4::FLOAT8[], $5::FLOAT8[], $6::TIMESTAMPTZ[]) \
                 WITH ORDINALITY AS e(from_time, to_time, jump_amount, occurred_at, ord) \
             ORDER BY e.ord",
        )
        .bind(user_id)
        .bind(session_id)
        .bind(&from)
        .bind(&to)
        .bind(&jumps)
        .bind(&occurred_at)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// List a user's seek events for a session in insertion order.
    pub async fn list_for_user(
        conn: &mut PgConnection,
        session_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<SeekEventRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM seek_events \
             WHERE session_id = $1 AND user_id = $2 \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, SeekEventRow>(&query)
            .bind(session_id)
            .bind(user_id)
            .fetch_all(conn)
            .await
    }
}
