//! Repository layer: one zero-sized struct per table with async CRUD
//! functions taking a pool or connection.

pub mod completion_repo;
pub mod progress_log_repo;
pub mod seek_event_repo;
pub mod session_repo;
pub mod watch_checkpoint_repo;
pub mod watch_segment_repo;

pub use completion_repo::CompletionRepo;
pub use progress_log_repo::ProgressLogRepo;
pub use seek_event_repo::SeekEventRepo;
pub use session_repo::SessionRepo;
pub use watch_checkpoint_repo::WatchCheckpointRepo;
pub use watch_segment_repo::WatchSegmentRepo;
