//! Watch event records exchanged between the tracker, storage and the
//! validator.
//!
//! Field names follow the persisted row shapes (`start_time`,
//! `checkpoint_time`, `jump_amount`, ...). The owning user and session are
//! carried by the surrounding context rather than by each record.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// A contiguous interval of observed playback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WatchSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    /// Either [`FIRST_VIEW_WEIGHT`](super::FIRST_VIEW_WEIGHT) or
    /// [`REPEAT_VIEW_WEIGHT`](super::REPEAT_VIEW_WEIGHT).
    pub weight: f64,
}

impl WatchSegment {
    pub fn new(start_time: f64, end_time: f64, weight: f64) -> Self {
        Self {
            start_time,
            end_time,
            duration: end_time - start_time,
            weight,
        }
    }

    /// Seconds this segment contributes to the watched total.
    pub fn weighted_duration(&self) -> f64 {
        self.duration * self.weight
    }
}

/// A checkpoint that playback passed through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckpointRecord {
    pub checkpoint_time: f64,
    /// False when a large seek shortly preceded reaching the checkpoint.
    pub is_natural: bool,
    pub reached_at: Timestamp,
}

/// A discrete jump in playback position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeekEvent {
    pub from_time: f64,
    pub to_time: f64,
    /// `to_time - from_time`; negative for backward seeks.
    pub jump_amount: f64,
    pub timestamp: Timestamp,
}

impl SeekEvent {
    pub fn new(from_time: f64, to_time: f64, timestamp: Timestamp) -> Self {
        Self {
            from_time,
            to_time,
            jump_amount: to_time - from_time,
            timestamp,
        }
    }
}

/// The event log of one user watching one session.
///
/// This is both the payload the tracker hands to storage and the input the
/// validator recomputes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressLog {
    #[serde(default)]
    pub segments: Vec<WatchSegment>,
    #[serde(default)]
    pub checkpoints: Vec<CheckpointRecord>,
    #[serde(default)]
    pub seeks: Vec<SeekEvent>,
}

impl ProgressLog {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.checkpoints.is_empty() && self.seeks.is_empty()
    }

    /// Total number of rows across the three logs.
    pub fn row_count(&self) -> usize {
        self.segments.len() + self.checkpoints.len() + self.seeks.len()
    }
}
