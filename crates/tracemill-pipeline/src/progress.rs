//! Progress reporting
//!
//! Progress is `ticks / estimate`. The estimate grows while the run discovers
//! work, so the raw ratio can move backwards; reported values are clamped so
//! that they never decrease and never reach 1.0. A finished run reports 0.0.

use parking_lot::Mutex;
use tracemill_core::ProgressCallback;

/// Ticks expected before any task is known: parse, bounds and finish.
pub const INITIAL_ESTIMATE: u64 = 3;

/// Ticks per task on top of its offset rings.
pub const TICKS_PER_TASK: u64 = 3;

const MAX_REPORTED: f64 = 0.999;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ProgressState {
    count: u64,
    estimate: u64,
    reported: f64,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            count: 0,
            estimate: INITIAL_ESTIMATE,
            reported: 0.0,
        }
    }
}

#[derive(Default)]
pub struct ProgressTracker {
    state: Mutex<ProgressState>,
    callback: Option<ProgressCallback>,
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("state", &*self.state.lock())
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback) -> Self {
        Self {
            state: Mutex::new(ProgressState::default()),
            callback: Some(callback),
        }
    }

    /// Start counting a new run.
    pub fn reset(&self) {
        *self.state.lock() = ProgressState::default();
    }

    /// Grow the expected tick count.
    pub fn add_estimate(&self, ticks: u64) {
        self.state.lock().estimate += ticks;
    }

    /// Last value sent to the callback.
    pub fn fraction(&self) -> f64 {
        self.state.lock().reported
    }

    /// Count one unit of work, report, then let other tasks run.
    pub async fn tick(&self) {
        let fraction = {
            let mut state = self.state.lock();
            state.count += 1;
            let raw = state.count as f64 / state.estimate.max(1) as f64;
            state.reported = raw.min(MAX_REPORTED).max(state.reported);
            state.reported
        };
        self.report(fraction);
        tokio::task::yield_now().await;
    }

    /// Report the idle value.
    pub fn finish(&self) {
        self.reset();
        self.report(0.0);
    }

    fn report(&self, fraction: f64) {
        tracing::trace!("Progress {:.3}", fraction);
        if let Some(callback) = &self.callback {
            callback(fraction);
        }
    }
}
