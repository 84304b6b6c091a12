//! Domain model for line annotations and the tags embedded in their bodies.
//!
//! # Responsibility
//! - Define the canonical annotation record and its persisted wire shape.
//! - Define tag declaration/reference records derived from annotation bodies.
//!
//! # Invariants
//! - Every annotation is identified by a stable, non-nil `AnnotationId`.
//! - An annotation without snapshot text never counts as anchored.

pub mod annotation;
pub mod tag;

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current wall-clock time as Unix epoch milliseconds.
///
/// Falls back to `0` when the system clock is before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
