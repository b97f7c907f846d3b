pub mod progress;
pub mod sessions;
