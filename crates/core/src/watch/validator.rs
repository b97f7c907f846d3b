//! Authoritative completion verdict, recomputed from persisted logs.
//!
//! Nothing the client reports as an aggregate is consulted here: the
//! verdict is derived from the raw segment, checkpoint and seek rows and
//! the session's own duration. The computation is pure, so the same rows
//! always produce the same verdict.

use serde::{Deserialize, Serialize};

use super::checkpoints::{end_checkpoint_time, generate_checkpoint_times, is_same_checkpoint};
use super::records::{ProgressLog, WatchSegment};
use super::sanitize::{sanitize_log, SanitizedLog};
use super::{
    FORWARD_JUMP_SECS, MAX_SUSPICIOUS_JUMPS, MIN_CHECKPOINT_SCORE, MIN_WATCHED_PERCENTAGE,
    SUSPICIOUS_JUMP_SECS,
};
use crate::error::CoreError;

/// Audit details attached to every verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictDetails {
    pub segment_count: usize,
    pub checkpoints_reached: usize,
    pub checkpoints_required: usize,
    pub video_duration: f64,
    /// Rows dropped by the malformed-row policy.
    pub skipped_rows: usize,
}

/// Result of validating one user's progress through one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressVerdict {
    pub is_valid: bool,
    /// Rounded, capped at 100.
    pub watched_percentage: u32,
    /// Weighted seconds; may exceed the video duration through re-watching.
    pub total_watched_time: f64,
    /// Naturally reached checkpoints as a rounded percentage.
    pub checkpoint_score: u32,
    pub forward_jumps: usize,
    pub suspicious_jumps: usize,
    pub has_reached_end: bool,
    pub details: VerdictDetails,
}

/// The completion rule, shared by the tracker's provisional check.
pub fn meets_completion_thresholds(
    watched_percentage: f64,
    checkpoint_score: f64,
    has_reached_end: bool,
    suspicious_jumps: usize,
) -> bool {
    watched_percentage >= MIN_WATCHED_PERCENTAGE
        && checkpoint_score >= MIN_CHECKPOINT_SCORE
        && has_reached_end
        && suspicious_jumps <= MAX_SUSPICIOUS_JUMPS
}

/// Weighted watch percentage, capped at 100.
pub fn watched_percentage(total_watched_time: f64, video_duration: f64) -> f64 {
    if video_duration <= 0.0 {
        return 0.0;
    }
    (total_watched_time / video_duration * 100.0).min(100.0)
}

/// Sum of `duration x weight` over `segments`, in order.
pub fn total_weighted_duration(segments: &[WatchSegment]) -> f64 {
    segments.iter().fold(0.0, |acc, s| acc + s.weighted_duration())
}

/// Recompute the completion verdict for `log` against a session duration.
///
/// Fails closed with [`CoreError::Validation`] when the duration is not a
/// positive finite number. An empty log is valid input and simply yields
/// `is_valid = false`.
pub fn validate_progress(
    video_duration: f64,
    log: &ProgressLog,
) -> Result<ProgressVerdict, CoreError> {
    if !video_duration.is_finite() || video_duration <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Video duration must be a positive number of seconds, got {video_duration}"
        )));
    }

    let canonical = generate_checkpoint_times(video_duration);
    let SanitizedLog { log, skipped_rows } = sanitize_log(log, video_duration);

    let total_watched_time = total_weighted_duration(&log.segments);
    let percentage = watched_percentage(total_watched_time, video_duration);

    let natural: Vec<f64> = log
        .checkpoints
        .iter()
        .filter(|c| c.is_natural)
        .map(|c| c.checkpoint_time)
        .collect();

    // Each canonical checkpoint counts once, however many records name it.
    let checkpoints_reached = canonical
        .iter()
        .filter(|&&t| natural.iter().any(|&r| is_same_checkpoint(r, t)))
        .count();
    let checkpoint_score = checkpoints_reached as f64 / canonical.len() as f64;

    let forward_jumps = log
        .seeks
        .iter()
        .filter(|s| s.jump_amount > FORWARD_JUMP_SECS)
        .count();
    let suspicious_jumps = log
        .seeks
        .iter()
        .filter(|s| s.jump_amount > SUSPICIOUS_JUMP_SECS)
        .count();

    let end = end_checkpoint_time(video_duration);
    let has_reached_end = natural.iter().any(|&t| t >= end);

    let is_valid = meets_completion_thresholds(
        percentage,
        checkpoint_score,
        has_reached_end,
        suspicious_jumps,
    );

    Ok(ProgressVerdict {
        is_valid,
        watched_percentage: percentage.round() as u32,
        total_watched_time,
        checkpoint_score: (checkpoint_score * 100.0).round() as u32,
        forward_jumps,
        suspicious_jumps,
        has_reached_end,
        details: VerdictDetails {
            segment_count: log.segments.len(),
            checkpoints_reached,
            checkpoints_required: canonical.len(),
            video_duration,
            skipped_rows,
        },
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
