//! Type aliases for commonly used complex types.
//!
//! Gives names to the shared-state and callback shapes used by the pipeline
//! so the same pattern reads the same way across crates.

use parking_lot::Mutex;
use std::sync::Arc;

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
///
/// Uses `parking_lot::Mutex`, so `lock()` never returns a poison error.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// A progress callback receiving the completed fraction in `[0, 1)`.
///
/// A value of `0.0` after work has started means "idle again", not "nothing done".
pub type ProgressCallback = Box<dyn Fn(f64) + Send + Sync>;

/// Create a new `ThreadSafe<T>` from a value.
#[inline]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}
