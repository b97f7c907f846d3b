//! Policy for malformed or out-of-range watch rows.
//!
//! Applied identically by the tracker (to raw player times) and by the
//! validator (to persisted rows). A bad row is clamped when it can be
//! repaired and skipped otherwise; it never aborts a verdict.
//!
//! - Segments: non-finite values are skipped, times are clamped to
//!   `[0, duration]`, rows whose clamped end is not after their start are
//!   skipped, the stored `duration` is recomputed from the clamped times,
//!   and weights are snapped to the nearer of the two allowed values.
//! - Checkpoint records: non-finite, negative, or past-the-end times are
//!   skipped.
//! - Seek events: non-finite times are skipped, times are clamped to
//!   `[0, duration]`, and the jump amount is recomputed from the clamped
//!   times (the stored `jump_amount` is not trusted).

use super::records::{CheckpointRecord, ProgressLog, SeekEvent, WatchSegment};
use super::{FIRST_VIEW_WEIGHT, REPEAT_VIEW_WEIGHT};

/// Clamp a player time into `[0, video_duration]`.
///
/// Returns `None` for non-finite input.
pub fn clamp_time(time: f64, video_duration: f64) -> Option<f64> {
    if !time.is_finite() {
        return None;
    }
    Some(time.clamp(0.0, video_duration.max(0.0)))
}

/// Snap an arbitrary weight to the nearer allowed value.
pub fn snap_weight(weight: f64) -> f64 {
    let midpoint = (FIRST_VIEW_WEIGHT + REPEAT_VIEW_WEIGHT) / 2.0;
    if weight.is_finite() && weight < midpoint {
        REPEAT_VIEW_WEIGHT
    } else {
        FIRST_VIEW_WEIGHT
    }
}

/// Repair or reject one segment.
pub fn sanitize_segment(segment: &WatchSegment, video_duration: f64) -> Option<WatchSegment> {
    if !segment.weight.is_finite() {
        return None;
    }
    let start = clamp_time(segment.start_time, video_duration)?;
    let end = clamp_time(segment.end_time, video_duration)?;
    if end <= start {
        return None;
    }
    Some(WatchSegment::new(start, end, snap_weight(segment.weight)))
}

/// Accept or reject one reached-checkpoint record.
pub fn sanitize_checkpoint(
    record: &CheckpointRecord,
    video_duration: f64,
) -> Option<CheckpointRecord> {
    let t = record.checkpoint_time;
    if !t.is_finite() || t < 0.0 || t > video_duration {
        return None;
    }
    Some(*record)
}

/// Repair or reject one seek event.
pub fn sanitize_seek(seek: &SeekEvent, video_duration: f64) -> Option<SeekEvent> {
    let from = clamp_time(seek.from_time, video_duration)?;
    let to = clamp_time(seek.to_time, video_duration)?;
    Some(SeekEvent::new(from, to, seek.timestamp))
}

/// A log after the policy has been applied, with the number of rows dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SanitizedLog {
    pub log: ProgressLog,
    pub skipped_rows: usize,
}

/// Apply the row policy to a whole log, preserving row order.
pub fn sanitize_log(log: &ProgressLog, video_duration: f64) -> SanitizedLog {
    let segments: Vec<_> = log
        .segments
        .iter()
        .filter_map(|s| sanitize_segment(s, video_duration))
        .collect();
    let checkpoints: Vec<_> = log
        .checkpoints
        .iter()
        .filter_map(|c| sanitize_checkpoint(c, video_duration))
        .collect();
    let seeks: Vec<_> = log
        .seeks
        .iter()
        .filter_map(|s| sanitize_seek(s, video_duration))
        .collect();

    let cleaned = ProgressLog {
        segments,
        checkpoints,
        seeks,
    };
    let skipped_rows = log.row_count() - cleaned.row_count();
    if skipped_rows > 0 {
        tracing::warn!(skipped_rows, video_duration, "Skipped malformed watch rows");
    }

    SanitizedLog {
        log: cleaned,
        skipped_rows,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
