//! Domain logic for course video progress.
//!
//! Holds everything that must behave identically wherever it runs: the
//! playback tracker, the authoritative validator, and the checkpoint
//! placement both of them depend on. No I/O lives here; persistence is
//! reached through [`watch::sink::ProgressSink`].

pub mod error;
pub mod roles;
pub mod types;
pub mod watch;
