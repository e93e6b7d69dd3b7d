//! Structural fingerprints used as cache keys
//!
//! A fingerprint is a hash of a value's serde representation, so two inputs that
//! serialize identically share a key no matter how they were built.

use crate::error::Result;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::Hasher;
use std::io;

/// Structural hash of a serializable value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Hash the JSON encoding of `value`.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let mut writer = HashWriter(DefaultHasher::new());
        serde_json::to_writer(&mut writer, value)?;
        Ok(Self(writer.0.finish()))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Feeds serialized bytes straight into the hasher.
struct HashWriter(DefaultHasher);

impl io::Write for HashWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
