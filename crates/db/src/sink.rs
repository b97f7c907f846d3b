//! PostgreSQL implementation of the tracker persistence seam.

use lms_core::error::CoreError;
use lms_core::types::DbId;
use lms_core::watch::records::ProgressLog;
use lms_core::watch::sink::{ProgressSink, SaveSummary};

use crate::repositories::ProgressLogRepo;
use crate::DbPool;

/// Stores tracker flushes in the watch log tables.
#[derive(Debug, Clone)]
pub struct PgProgressSink {
    pool: DbPool,
}

impl PgProgressSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProgressSink for PgProgressSink {
    async fn save_progress(
        &self,
        session_id: DbId,
        user_id: DbId,
        log: &ProgressLog,
    ) -> Result<SaveSummary, CoreError> {
        ProgressLogRepo::save(&self.pool, session_id, user_id, log)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to store watch progress: {e}")))
    }
}
