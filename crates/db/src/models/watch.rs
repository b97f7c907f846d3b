//! Watch log rows: segments, reached checkpoints and seek events.
//!
//! Rows convert into the core record types so the validator can run over
//! them directly.

use lms_core::types::{DbId, Timestamp};
use lms_core::watch::records::{CheckpointRecord, SeekEvent, WatchSegment};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `watch_segments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WatchSegmentRow {
    pub id: DbId,
    pub user_id: DbId,
    pub session_id: DbId,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub weight: f64,
    pub created_at: Timestamp,
}

impl From<WatchSegmentRow> for WatchSegment {
    fn from(row: WatchSegmentRow) -> Self {
        Self {
            start_time: row.start_time,
            end_time: row.end_time,
            duration: row.duration,
            weight: row.weight,
        }
    }
}

/// A row from the `watch_checkpoints` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WatchCheckpointRow {
    pub id: DbId,
    pub user_id: DbId,
    pub session_id: DbId,
    pub checkpoint_time: f64,
    pub is_natural: bool,
    pub reached_at: Timestamp,
}

impl From<WatchCheckpointRow> for CheckpointRecord {
    fn from(row: WatchCheckpointRow) -> Self {
        Self {
            checkpoint_time: row.checkpoint_time,
            is_natural: row.is_natural,
            reached_at: row.reached_at,
        }
    }
}

/// A row from the `seek_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SeekEventRow {
    pub id: DbId,
    pub user_id: DbId,
    pub session_id: DbId,
    pub from_time: f64,
    pub to_time: f64,
    pub jump_amount: f64,
    pub occurred_at: Timestamp,
}

impl From<SeekEventRow> for SeekEvent {
    fn from(row: SeekEventRow) -> Self {
        Self {
            from_time: row.from_time,
            to_time: row.to_time,
            jump_amount: row.jump_amount,
            timestamp: row.occurred_at,
        }
    }
}
