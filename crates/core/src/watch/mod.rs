//! Anti-skip video watch tracking and validation.
//!
//! Two components share the definitions in this module:
//!
//! - [`tracker`]: an optimistic, client-side estimator fed by player
//!   callbacks. Its verdict is advisory only.
//! - [`validator`]: the authoritative recomputation from persisted logs.
//!
//! Both place checkpoints through [`checkpoints::generate_checkpoint_times`]
//! and treat bad rows through [`sanitize`], so they cannot disagree on
//! what "complete" means.

pub mod checkpoints;
pub mod ranges;
pub mod records;
pub mod sanitize;
pub mod sink;
pub mod tracker;
pub mod validator;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Minimum watched percentage (0-100) required for completion.
pub const MIN_WATCHED_PERCENTAGE: f64 = 80.0;

/// Minimum fraction of checkpoints that must be reached naturally.
pub const MIN_CHECKPOINT_SCORE: f64 = 0.8;

/// Maximum number of suspicious jumps tolerated before completion is denied.
pub const MAX_SUSPICIOUS_JUMPS: usize = 2;

/// A seek larger than this (seconds) counts as a suspicious jump.
pub const SUSPICIOUS_JUMP_SECS: f64 = 60.0;

/// A forward seek larger than this (seconds) voids ranges it skips over.
pub const FORWARD_JUMP_SECS: f64 = 10.0;

/// A seek larger than this (seconds) makes the next checkpoints unnatural.
pub const RECENT_JUMP_SECS: f64 = 5.0;

/// Wall-clock window (milliseconds) in which a jump taints a checkpoint.
pub const RECENT_JUMP_WINDOW_MS: i64 = 5_000;

// ---------------------------------------------------------------------------
// Weighting
// ---------------------------------------------------------------------------

/// Weight of a segment covering time not previously watched.
pub const FIRST_VIEW_WEIGHT: f64 = 1.0;

/// Weight of a segment overlapping an already-watched range.
pub const REPEAT_VIEW_WEIGHT: f64 = 0.3;

/// Playback seconds accumulated before a time update closes a segment.
pub const SEGMENT_TICK_SECS: f64 = 1.0;
