//! Checkpoint placement.
//!
//! The tracker and the validator both call [`generate_checkpoint_times`].
//! Any second implementation of this arithmetic would let the two sides
//! disagree about which checkpoints exist, so there must never be one.

/// Video seconds per minute of checkpoint spacing.
const SECS_PER_MINUTE: f64 = 60.0;

/// Divisor turning a duration into checkpoint spacing (minutes).
const SPACING_DIVISOR: f64 = 180.0;

/// The end checkpoint sits at most this many seconds before the end...
pub const END_CHECKPOINT_LEAD_SECS: f64 = 30.0;

/// ...and never earlier than this fraction of the duration.
pub const END_CHECKPOINT_FRACTION: f64 = 0.9;

/// Spacing between regular checkpoints, in seconds.
///
/// One checkpoint every `max(1, floor(d / 180))` minutes.
pub fn checkpoint_interval_secs(video_duration: f64) -> f64 {
    (video_duration / SPACING_DIVISOR).floor().max(1.0) * SECS_PER_MINUTE
}

/// Time of the mandatory checkpoint near the end of the video.
///
/// `floor(max(d - 30, d * 0.9))`.
pub fn end_checkpoint_time(video_duration: f64) -> f64 {
    (video_duration - END_CHECKPOINT_LEAD_SECS)
        .max(video_duration * END_CHECKPOINT_FRACTION)
        .floor()
}

/// Generate the canonical, strictly ascending checkpoint times for a video.
///
/// Regular checkpoints are emitted at each interval multiple that falls
/// strictly before the end checkpoint, and the end checkpoint is always
/// last (very short videos get a single checkpoint at `0`). Returns an
/// empty list for non-finite or non-positive durations.
pub fn generate_checkpoint_times(video_duration: f64) -> Vec<f64> {
    if !video_duration.is_finite() || video_duration <= 0.0 {
        return Vec::new();
    }

    let interval = checkpoint_interval_secs(video_duration);
    let end = end_checkpoint_time(video_duration);

    let mut times = Vec::new();
    let mut t = interval;
    while t < end {
        times.push(t);
        t += interval;
    }
    times.push(end);
    times
}

/// Whether `time` designates the same checkpoint as `canonical`.
///
/// Persisted times travel through JSON and FLOAT8 columns, so equality is
/// checked with a small tolerance.
pub fn is_same_checkpoint(time: f64, canonical: f64) -> bool {
    (time - canonical).abs() < 1e-6
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
