//! Persistence seam for tracker event logs.

use serde::{Deserialize, Serialize};

use super::records::ProgressLog;
use crate::error::CoreError;
use crate::types::DbId;

/// Row counts written by one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub segments_written: u64,
    /// Reached checkpoints newly recorded; already-recorded ones are ignored.
    pub checkpoints_written: u64,
    pub seeks_written: u64,
}

/// Durable storage for the watch logs of a `(session, user)` pair.
///
/// Implementations append rows; they never rewrite or delete earlier ones.
/// Reached checkpoints are write-once: a second record for the same
/// checkpoint time leaves the first in place.
pub trait ProgressSink: Send + Sync {
    /// Append `log` to the stored logs of `user_id` watching `session_id`.
    fn save_progress(
        &self,
        session_id: DbId,
        user_id: DbId,
        log: &ProgressLog,
    ) -> impl std::future::Future<Output = Result<SaveSummary, CoreError>> + Send;
}
