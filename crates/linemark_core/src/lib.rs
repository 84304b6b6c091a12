//! Line annotation anchoring engine.
//!
//! Keeps free-text annotations bound to "their" line of a text file while the
//! file is edited, using only a remembered text snapshot per annotation.
//! The crate never renders and never touches the filesystem except through
//! the store and logging bootstrap.

pub mod anchor;
pub mod config;
pub mod engine;
pub mod event;
pub mod logging;
pub mod model;
pub mod policy;
pub mod reconcile;
pub mod service;
pub mod source;
pub mod store;
pub mod tags;

pub use anchor::gate::{check_specificity, passes_specificity_gate, search_radius, GateRejection};
pub use anchor::matcher::{resolve, resolve_excluding, AnchorResolution};
pub use config::{ConfigError, EngineConfig, LoggingConfig};
pub use engine::{EngineError, FileEngine, ResolvedAnchor};
pub use event::EngineEvent;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::annotation::{
    Annotation, AnnotationId, AnnotationValidationError, AnnotationsByFile,
};
pub use model::now_epoch_ms;
pub use model::tag::{Declaration, Reference, TagSpan};
pub use policy::{
    ChangeKind, ChangeOutcome, DebounceState, Debouncer, DocumentChangeEvent, LineChange,
    RecentInputTracker, SnapshotUpdatePolicy,
};
pub use reconcile::{apply_resolutions, resolve_all, ReconcileOutcome};
pub use service::{AnnotationService, ServiceError};
pub use source::{split_lines, MemoryTextSource, TextSnapshotSource};
pub use store::{
    AnnotationStore, JsonFileAnnotationStore, MemoryAnnotationStore, StoreError, StoreResult,
};
pub use tags::TagGraph;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
