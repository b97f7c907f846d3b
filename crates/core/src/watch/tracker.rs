//! Client-side progress tracker.
//!
//! Turns player callbacks (play, pause, time update, seeked) into watch
//! segments, merged watched ranges, checkpoint states and seek events.
//!
//! The state lives in a plain [`TrackerState`] value and every callback is
//! a pure transition (`apply_*`) from one state to the next, which keeps
//! the rules testable without a player. [`ProgressTracker`] wraps the same
//! transitions behind the familiar `on_*` callback names and stamps events
//! with the wall clock.
//!
//! Verdicts computed here are provisional. Only
//! [`validate_progress`](super::validator::validate_progress) over persisted
//! rows may grant credit.

use serde::{Deserialize, Serialize};

use super::checkpoints::generate_checkpoint_times;
use super::ranges::WatchedRanges;
use super::records::{CheckpointRecord, ProgressLog, SeekEvent, WatchSegment};
use super::sanitize::clamp_time;
use super::sink::ProgressSink;
use super::validator::{
    meets_completion_thresholds, total_weighted_duration, validate_progress, watched_percentage,
    ProgressVerdict,
};
use super::{
    FIRST_VIEW_WEIGHT, FORWARD_JUMP_SECS, RECENT_JUMP_SECS, RECENT_JUMP_WINDOW_MS,
    REPEAT_VIEW_WEIGHT, SEGMENT_TICK_SECS, SUSPICIOUS_JUMP_SECS,
};
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// A checkpoint as seen by the tracker. `reached` never reverts to false.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub time: f64,
    pub reached: bool,
    pub is_natural: bool,
    pub reached_at: Option<Timestamp>,
}

impl Checkpoint {
    fn pending(time: f64) -> Self {
        Self {
            time,
            reached: false,
            is_natural: false,
            reached_at: None,
        }
    }

    pub fn reached_naturally(&self) -> bool {
        self.reached && self.is_natural
    }
}

/// How many rows of each log have already reached durable storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushCursor {
    pub segments: usize,
    pub checkpoints: usize,
    pub seeks: usize,
}

/// Everything the tracker knows about one user watching one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    pub session_id: DbId,
    pub user_id: DbId,
    pub video_duration: f64,
    pub is_playing: bool,
    /// Start of the segment currently accumulating.
    pub last_time: f64,
    pub segments: Vec<WatchSegment>,
    pub ranges: WatchedRanges,
    pub checkpoints: Vec<Checkpoint>,
    /// Reached checkpoints in the order they were reached.
    pub reached: Vec<CheckpointRecord>,
    pub seeks: Vec<SeekEvent>,
    pub flushed: FlushCursor,
}

impl TrackerState {
    pub fn new(session_id: DbId, user_id: DbId, video_duration: f64) -> Self {
        let checkpoints = generate_checkpoint_times(video_duration)
            .into_iter()
            .map(Checkpoint::pending)
            .collect();
        Self {
            session_id,
            user_id,
            video_duration,
            checkpoints,
            ..Default::default()
        }
    }

    /// Sum of `duration x weight` over every recorded segment.
    ///
    /// Repeat viewing is counted at reduced weight, so this can exceed the
    /// video duration.
    pub fn total_watched_time(&self) -> f64 {
        total_weighted_duration(&self.segments)
    }

    pub fn watched_percentage(&self) -> f64 {
        watched_percentage(self.total_watched_time(), self.video_duration)
    }

    /// Fraction of checkpoints reached naturally.
    pub fn checkpoint_score(&self) -> f64 {
        if self.checkpoints.is_empty() {
            return 0.0;
        }
        let natural = self
            .checkpoints
            .iter()
            .filter(|c| c.reached_naturally())
            .count();
        natural as f64 / self.checkpoints.len() as f64
    }

    pub fn suspicious_jumps(&self) -> usize {
        self.seeks
            .iter()
            .filter(|s| s.jump_amount > SUSPICIOUS_JUMP_SECS)
            .count()
    }

    /// Provisional completion check over the in-memory state.
    pub fn is_valid_for_completion(&self) -> bool {
        let end_reached = self
            .checkpoints
            .last()
            .is_some_and(Checkpoint::reached_naturally);
        meets_completion_thresholds(
            self.watched_percentage(),
            self.checkpoint_score(),
            end_reached,
            self.suspicious_jumps(),
        )
    }

    /// The full event log recorded so far.
    pub fn progress_data(&self) -> ProgressLog {
        ProgressLog {
            segments: self.segments.clone(),
            checkpoints: self.reached.clone(),
            seeks: self.seeks.clone(),
        }
    }

    /// Rows recorded since the last successful flush.
    pub fn pending_progress(&self) -> ProgressLog {
        fn unflushed<T: Clone>(rows: &[T], flushed: usize) -> Vec<T> {
            rows.get(flushed..).unwrap_or_default().to_vec()
        }
        ProgressLog {
            segments: unflushed(&self.segments, self.flushed.segments),
            checkpoints: unflushed(&self.reached, self.flushed.checkpoints),
            seeks: unflushed(&self.seeks, self.flushed.seeks),
        }
    }

    fn has_recent_jump(&self, now: Timestamp) -> bool {
        self.seeks.iter().rev().any(|s| {
            let age_ms = (now - s.timestamp).num_milliseconds();
            s.jump_amount > RECENT_JUMP_SECS && (0..=RECENT_JUMP_WINDOW_MS).contains(&age_ms)
        })
    }

    /// Record `[start, end)` as watched, weighting repeats.
    fn close_segment(&mut self, start: f64, end: f64) {
        if end <= start {
            return;
        }
        let weight = if self.ranges.overlaps(start, end) {
            REPEAT_VIEW_WEIGHT
        } else {
            FIRST_VIEW_WEIGHT
        };
        self.segments.push(WatchSegment::new(start, end, weight));
        self.ranges.insert(start, end, weight);
    }

    fn reach_checkpoints(&mut self, current_time: f64, now: Timestamp) {
        let is_natural = !self.has_recent_jump(now);
        for cp in self
            .checkpoints
            .iter_mut()
            .filter(|c| !c.reached && c.time <= current_time)
        {
            cp.reached = true;
            cp.is_natural = is_natural;
            cp.reached_at = Some(now);
            self.reached.push(CheckpointRecord {
                checkpoint_time: cp.time,
                is_natural,
                reached_at: now,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Playback started at `current_time`. No segment is closed.
pub fn apply_play(mut state: TrackerState, current_time: f64) -> TrackerState {
    if let Some(t) = clamp_time(current_time, state.video_duration) {
        state.last_time = t;
    }
    state.is_playing = true;
    state
}

/// Playback paused at `current_time`; closes the running segment.
pub fn apply_pause(mut state: TrackerState, current_time: f64) -> TrackerState {
    if state.is_playing {
        if let Some(t) = clamp_time(current_time, state.video_duration) {
            state.close_segment(state.last_time, t);
            state.last_time = t;
        }
    }
    state.is_playing = false;
    state
}

/// Periodic position report while playing.
///
/// Marks newly passed checkpoints, then closes a segment once at least
/// [`SEGMENT_TICK_SECS`] of playback has accumulated.
pub fn apply_time_update(
    mut state: TrackerState,
    current_time: f64,
    now: Timestamp,
) -> TrackerState {
    if !state.is_playing {
        return state;
    }
    let Some(t) = clamp_time(current_time, state.video_duration) else {
        return state;
    };

    state.reach_checkpoints(t, now);

    if t - state.last_time >= SEGMENT_TICK_SECS {
        state.close_segment(state.last_time, t);
        state.last_time = t;
    }
    state
}

/// The player jumped from `from_time` to `to_time`.
///
/// A forward jump beyond [`FORWARD_JUMP_SECS`] voids every watched range it
/// skips over entirely. The segment boundary always moves to `to_time`.
pub fn apply_seeked(
    mut state: TrackerState,
    from_time: f64,
    to_time: f64,
    now: Timestamp,
) -> TrackerState {
    let duration = state.video_duration;
    let (Some(from), Some(to)) = (clamp_time(from_time, duration), clamp_time(to_time, duration))
    else {
        return state;
    };

    let seek = SeekEvent::new(from, to, now);
    if seek.jump_amount > FORWARD_JUMP_SECS {
        let voided = state.ranges.invalidate_within(from, to);
        if voided > 0 {
            tracing::debug!(
                session_id = state.session_id,
                user_id = state.user_id,
                from,
                to,
                voided,
                "Forward seek voided watched ranges"
            );
        }
    }
    state.seeks.push(seek);
    state.last_time = to;
    state
}

// ---------------------------------------------------------------------------
// Callback wrapper
// ---------------------------------------------------------------------------

/// Owning wrapper over [`TrackerState`] driven by player callbacks.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    state: TrackerState,
}

impl ProgressTracker {
    pub fn new(session_id: DbId, user_id: DbId, video_duration: f64) -> Self {
        Self {
            state: TrackerState::new(session_id, user_id, video_duration),
        }
    }

    /// Resume tracking from a previously serialized state.
    pub fn from_state(state: TrackerState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    fn apply(&mut self, transition: impl FnOnce(TrackerState) -> TrackerState) {
        let state = std::mem::take(&mut self.state);
        self.state = transition(state);
    }

    pub fn on_play(&mut self, current_time: f64) {
        self.apply(|s| apply_play(s, current_time));
    }

    pub fn on_pause(&mut self, current_time: f64) {
        self.apply(|s| apply_pause(s, current_time));
    }

    pub fn on_time_update(&mut self, current_time: f64) {
        let now = chrono::Utc::now();
        self.apply(|s| apply_time_update(s, current_time, now));
    }

    pub fn on_seeked(&mut self, from_time: f64, to_time: f64) {
        let now = chrono::Utc::now();
        self.apply(|s| apply_seeked(s, from_time, to_time, now));
    }

    pub fn total_watched_time(&self) -> f64 {
        self.state.total_watched_time()
    }

    pub fn watched_percentage(&self) -> f64 {
        self.state.watched_percentage()
    }

    pub fn is_valid_for_completion(&self) -> bool {
        self.state.is_valid_for_completion()
    }

    /// Run the authoritative algorithm over the local log.
    ///
    /// Useful for showing the user the same breakdown the server will
    /// compute; still advisory, since the log has not been persisted.
    pub fn verdict(&self) -> Result<ProgressVerdict, CoreError> {
        validate_progress(self.state.video_duration, &self.state.progress_data())
    }

    pub fn progress_data(&self) -> ProgressLog {
        self.state.progress_data()
    }

    /// Flush rows recorded since the last successful save to `sink`.
    ///
    /// Returns whether the flush succeeded. On failure nothing is marked as
    /// flushed, so the same rows are offered again next time; tracking
    /// itself is never affected.
    pub async fn save_progress<S: ProgressSink>(&mut self, sink: &S) -> bool {
        let pending = self.state.pending_progress();
        if pending.is_empty() {
            return true;
        }

        let (session_id, user_id) = (self.state.session_id, self.state.user_id);
        match sink.save_progress(session_id, user_id, &pending).await {
            Ok(summary) => {
                let cursor = &mut self.state.flushed;
                cursor.segments += pending.segments.len();
                cursor.checkpoints += pending.checkpoints.len();
                cursor.seeks += pending.seeks.len();
                tracing::debug!(
                    session_id,
                    user_id,
                    segments = summary.segments_written,
                    checkpoints = summary.checkpoints_written,
                    seeks = summary.seeks_written,
                    "Watch progress saved"
                );
                true
            }
            Err(e) => {
                tracing::warn!(session_id, user_id, error = %e, "Failed to save watch progress");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
