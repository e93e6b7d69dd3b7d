//! # TraceMill Pipeline
//!
//! Runs a batch of drawing tasks through plotting, polygon merging, offset
//! ring generation and preview rendering. Results are cached by fingerprint,
//! progress is reported as a fraction of estimated work, and a newer run
//! supersedes one still in flight.

pub mod cache;
pub mod cancel;
pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod stage;

pub use cache::{CacheStore, LruStore, DEFAULT_BATCH_CAPACITY, DEFAULT_RING_CAPACITY};
pub use cancel::{CancellationToken, Generation};
pub use error::{PipelineError, PipelineResult};
pub use orchestrator::{BatchResult, Pipeline, PipelineConfig};
pub use progress::ProgressTracker;
pub use stage::PipelineStage;
