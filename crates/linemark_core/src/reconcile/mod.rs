//! Whole-file reconciliation.
//!
//! # Responsibility
//! - Resolve every annotation of one file in a single deterministic pass.
//! - Apply resolutions back onto annotation records and report what moved.
//!
//! # Invariants
//! - No two annotations in one batch resolve to the same line.
//! - Presumptively stable anchors (exact match at stored line) are processed
//!   first, then ascending `created_at`, then id.
//! - Each pass replaces the resolved state wholesale.

pub mod batch;

pub use batch::{apply_resolutions, resolve_all, resolve_unavailable, ReconcileOutcome};
