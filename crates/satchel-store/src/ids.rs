//! Identity Allocator.
//!
//! Issues 64-bit identifiers that are globally unique across *every* entity
//! kind: documents, aspects, briefcases, collections, predicates,
//! credentials and accounts all draw from the same counter, so no two
//! entities of any kind ever collide. Identifiers are monotonically
//! increasing and never reused, even after deletion: the next unissued value
//! is persisted at the store root, so a reopened store continues where the
//! previous process stopped.
//!
//! `0` is reserved as "no id" and is never issued.

use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::debug;

use satchel_core::{EntityId, Error, Result};

use crate::fsio;

/// File holding the next unissued identifier, relative to the store root.
pub(crate) const COUNTER_FILE: &str = "ids.next";

/// Monotonic identifier allocator with a persisted high-water mark.
pub struct IdAllocator {
    path: PathBuf,
    next: Mutex<u64>,
}

impl IdAllocator {
    /// Open the allocator, resuming from a persisted counter when present.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let next = match fsio::read_optional(&path)? {
            Some(bytes) => {
                let text = String::from_utf8(bytes)
                    .map_err(|e| Error::Serialization(format!("id counter: {}", e)))?;
                text.trim()
                    .parse::<u64>()
                    .map_err(|e| Error::Serialization(format!("id counter: {}", e)))?
            }
            None => 1,
        };
        debug!(next, "ids: opened");
        Ok(Self {
            path,
            next: Mutex::new(next.max(1)),
        })
    }

    /// Issue the next identifier. The persisted mark is advanced before the
    /// identifier is handed out, so a crash can skip values but never
    /// re-issue one.
    pub fn next_id(&self) -> Result<EntityId> {
        let mut next = self.next.lock();
        let id = *next;
        let advanced = id + 1;
        fsio::write_atomic(&self.path, advanced.to_string().as_bytes())?;
        *next = advanced;
        Ok(id)
    }
}
