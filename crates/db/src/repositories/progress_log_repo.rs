//! Whole-log reads and writes across the three watch log tables.

use lms_core::types::DbId;
use lms_core::watch::records::ProgressLog;
use lms_core::watch::sink::SaveSummary;
use sqlx::PgPool;

use super::{SeekEventRepo, WatchCheckpointRepo, WatchSegmentRepo};

/// Reads and writes a user's complete watch log for a session.
pub struct ProgressLogRepo;

impl ProgressLogRepo {
    /// Append a tracker flush atomically.
    ///
    /// Either every row of `log` is stored or none is, so a crash mid-flush
    /// cannot leave segments without the seeks recorded alongside them.
    pub async fn save(
        pool: &PgPool,
        session_id: DbId,
        user_id: DbId,
        log: &ProgressLog,
    ) -> Result<SaveSummary, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let segments_written =
            WatchSegmentRepo::insert_many(&mut *tx, session_id, user_id, &log.segments).await?;
        let checkpoints_written =
            WatchCheckpointRepo::insert_many(&mut *tx, session_id, user_id, &log.checkpoints)
                .await?;
        let seeks_written =
            SeekEventRepo::insert_many(&mut *tx, session_id, user_id, &log.seeks).await?;

        tx.commit().await?;

        tracing::debug!(
            session_id,
            user_id,
            segments_written,
            checkpoints_written,
            seeks_written,
            "Stored watch log rows"
        );

        Ok(SaveSummary {
            segments_written,
            checkpoints_written,
            seeks_written,
        })
    }

    /// Load everything persisted for a user and session, in insertion order.
    ///
    /// The three tables are read from one snapshot, so a flush committing
    /// mid-load is either wholly visible or not at all.
    pub async fn load(
        pool: &PgPool,
        session_id: DbId,
        user_id: DbId,
    ) -> Result<ProgressLog, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let segments = WatchSegmentRepo::list_for_user(&mut *tx, session_id, user_id).await?;
        let checkpoints =
            WatchCheckpointRepo::list_for_user(&mut *tx, session_id, user_id).await?;
        let seeks = SeekEventRepo::list_for_user(&mut *tx, session_id, user_id).await?;

        tx.commit().await?;

        Ok(ProgressLog {
            segments: segments.into_iter().map(Into::into).collect(),
            checkpoints: checkpoints.into_iter().map(Into::into).collect(),
            seeks: seeks.into_iter().map(Into::into).collect(),
        })
    }
}
