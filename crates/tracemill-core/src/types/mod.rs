//! Type system utilities and aliases.
//!
//! - [`aliases`]: Type aliases for `Arc<Mutex<T>>` and progress callbacks.

pub mod aliases;

pub use aliases::*;
