//! Single-annotation anchor resolution.
//!
//! # Responsibility
//! - Reject snapshots too generic to anchor reliably (specificity gate).
//! - Resolve one annotation to a line by exact text equality near its
//!   stored position.
//!
//! # Invariants
//! - The gate runs before any positional search.
//! - Matching is exact, case-sensitive, whitespace-trimmed equality.
//! - No full-document scan and no similarity fallback: unresolved beats a
//!   wrong guess.

pub mod gate;
pub mod matcher;
