//! Snapshot refresh and reconciliation scheduling on document changes.
//!
//! # Responsibility
//! - Classify document changes as line-count-preserving or structural.
//! - Refresh snapshots in place for in-line edits; debounce reconciliation
//!   for structural edits.
//! - Refuse to mutate anything for changes without recent user input.
//!
//! # Invariants
//! - At most one reconciliation is pending; a new edit restarts its deadline.
//! - A non-interactive change never mutates annotations and drops any pending
//!   reconciliation.
//! - After a non-interactive change, the next genuine edit of any kind
//!   schedules reconciliation; in-place refresh resumes once it has run.

pub mod change;
pub mod debounce;
pub mod input;
pub mod snapshot;

pub use change::{ChangeKind, DocumentChangeEvent, LineChange};
pub use debounce::{DebounceState, Debouncer};
pub use input::RecentInputTracker;
pub use snapshot::{ChangeOutcome, SnapshotUpdatePolicy};
