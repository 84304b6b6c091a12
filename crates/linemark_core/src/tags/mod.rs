//! Cross-file tag index derived from annotation bodies.
//!
//! # Responsibility
//! - Extract `$name` declarations and `@name` references from bodies.
//! - Answer navigation and completion queries.
//!
//! # Invariants
//! - The index is an immutable value rebuilt from the full annotation set;
//!   it is never patched incrementally.
//! - At most one declaration per name; the most recently written one wins.
//! - Tag lines follow `Annotation::current_line`; unresolved owners have none.
//! - Tag names follow `[A-Za-z_][A-Za-z0-9_]*`.

pub mod graph;

pub use graph::TagGraph;
