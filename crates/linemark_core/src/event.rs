//! Notifications emitted toward the host after reconciliation.

use crate::model::annotation::AnnotationId;

/// User-facing notification produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Annotation moved from `old_line` to `new_line`.
    AnnotationRepositioned {
        id: AnnotationId,
        file_path: String,
        old_line: usize,
        new_line: usize,
    },
    /// Annotation lost its anchor and is now flagged as unresolved.
    AnnotationUnresolved { id: AnnotationId, file_path: String },
}

impl EngineEvent {
    pub fn annotation_id(&self) -> AnnotationId {
        match self {
            Self::AnnotationRepositioned { id, .. } | Self::AnnotationUnresolved { id, .. } => *id,
        }
    }
}
