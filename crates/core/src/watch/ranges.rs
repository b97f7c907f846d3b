//! The merged set of timeline ranges credited to a viewer.

use serde::{Deserialize, Serialize};

/// A coalesced span of watched video time.
///
/// `weight` records the weight of the segment last merged into the range.
/// It only informs overlap bookkeeping and is never summed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WatchedRange {
    pub start: f64,
    pub end: f64,
    pub weight: f64,
}

impl WatchedRange {
    pub fn seconds(&self) -> f64 {
        self.end - self.start
    }
}

/// Sorted, non-overlapping, non-touching watched ranges.
///
/// Invariant: `ranges[i].end < ranges[i + 1].start` for every `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchedRanges(Vec<WatchedRange>);

impl WatchedRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[WatchedRange] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `[start, end)` shares any positive-length span with a range.
    ///
    /// Ranges that merely touch the interval do not count, so back-to-back
    /// segments of continuous playback are never weighted as repeats.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.0.iter().any(|r| r.start < end && r.end > start)
    }

    /// Merge `[start, end)` into the set, coalescing every range it
    /// overlaps or touches. Empty or inverted intervals are ignored.
    pub fn insert(&mut self, start: f64, end: f64, weight: f64) {
        if start.is_nan() || end.is_nan() || end <= start {
            return;
        }

        let mut merged = WatchedRange { start, end, weight };
        let mut kept = Vec::with_capacity(self.0.len() + 1);
        for r in self.0.drain(..) {
            if r.start <= merged.end && r.end >= merged.start {
                merged.start = merged.start.min(r.start);
                merged.end = merged.end.max(r.end);
            } else {
                kept.push(r);
            }
        }

        let pos = kept.partition_point(|r| r.start < merged.start);
        kept.insert(pos, merged);
        self.0 = kept;
    }

    /// Drop every range lying entirely within `[from, to]`.
    ///
    /// Ranges that only partly intersect the span are left untouched.
    /// Returns the number of ranges removed.
    pub fn invalidate_within(&mut self, from: f64, to: f64) -> usize {
        let before = self.0.len();
        self.0.retain(|r| !(r.start >= from && r.end <= to));
        before - self.0.len()
    }

    /// Total seconds covered, ignoring weight.
    pub fn covered_seconds(&self) -> f64 {
        self.0.iter().map(WatchedRange::seconds).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
