//! Run supersession
//!
//! Every run takes a [`CancellationToken`] from the pipeline's [`Generation`].
//! Starting another run bumps the generation, and older tokens report
//! themselves as superseded at their next check.

use crate::error::{PipelineError, PipelineResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic run counter
#[derive(Debug, Clone, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, superseding all earlier tokens.
    pub fn begin(&self) -> CancellationToken {
        let id = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        CancellationToken {
            current: Arc::clone(&self.0),
            id,
        }
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handle carried through a run
#[derive(Debug, Clone)]
pub struct CancellationToken {
    current: Arc<AtomicU64>,
    id: u64,
}

impl CancellationToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_superseded(&self) -> bool {
        self.current.load(Ordering::SeqCst) != self.id
    }

    /// Fail with [`PipelineError::Superseded`] once a newer run has started.
    pub fn check(&self) -> PipelineResult<()> {
        if self.is_superseded() {
            Err(PipelineError::Superseded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_run_supersedes() {
        let generation = Generation::new();
        let first = generation.begin();
        assert!(first.check().is_ok());

        let second = generation.begin();
        assert!(first.is_superseded());
        assert!(matches!(first.check(), Err(PipelineError::Superseded)));
        assert!(!second.is_superseded());
        assert_eq!(generation.current(), second.id());
    }
}
