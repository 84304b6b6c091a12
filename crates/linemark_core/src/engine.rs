//! Per-file annotation engine.
//!
//! # Responsibility
//! - Own one file's annotation collection and its snapshot update policy.
//! - Expose create/edit/delete, pure resolution, and reconciliation.
//!
//! # Invariants
//! - Only reconciliation, the in-line refresh path, and direct user edits
//!   touch `stored_line` / `content_snapshot`.
//! - Unavailable text resolves every annotation as unresolved; the last known
//!   snapshot is never used to guess.
//! - At most one matched annotation is created or re-attached per line.

use crate::anchor::matcher::AnchorResolution;
use crate::config::EngineConfig;
use crate::model::annotation::{Annotation, AnnotationId};
use crate::policy::{ChangeOutcome, DocumentChangeEvent, SnapshotUpdatePolicy};
use crate::reconcile::{apply_resolutions, resolve_all, resolve_unavailable, ReconcileOutcome};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Resolution row handed to rendering layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAnchor {
    pub id: AnnotationId,
    /// `None` while unresolved.
    pub line: Option<usize>,
    pub matched: bool,
}

/// Errors from direct annotation operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Requested line does not exist in the current text.
    LineOutOfRange { line: usize, line_count: usize },
    /// Requested line is blank and cannot anchor anything.
    EmptyAnchorLine(usize),
    /// Another matched annotation already sits on the line.
    LineAlreadyAnnotated { line: usize, existing: AnnotationId },
    AnnotationNotFound(AnnotationId),
    /// Current text of the file is unavailable.
    SourceUnavailable(String),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LineOutOfRange { line, line_count } => {
                write!(f, "line {line} is out of range for {line_count} lines")
            }
            Self::EmptyAnchorLine(line) => write!(f, "line {line} is blank"),
            Self::LineAlreadyAnnotated { line, existing } => {
                write!(f, "line {line} already carries annotation {existing}")
            }
            Self::AnnotationNotFound(id) => write!(f, "annotation not found: {id}"),
            Self::SourceUnavailable(path) => write!(f, "text unavailable for `{path}`"),
        }
    }
}

impl Error for EngineError {}

/// Owns and reconciles the annotations of one file.
#[derive(Debug, Clone)]
pub struct FileEngine {
    file_path: String,
    annotations: Vec<Annotation>,
    policy: SnapshotUpdatePolicy,
}

impl FileEngine {
    pub fn new(
        file_path: impl Into<String>,
        annotations: Vec<Annotation>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            annotations,
            policy: SnapshotUpdatePolicy::from_config(config),
        }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|annotation| annotation.id == id)
    }

    pub fn policy(&self) -> &SnapshotUpdatePolicy {
        &self.policy
    }

    /// Resolves every annotation without mutating anything.
    ///
    /// Rows follow the stored annotation order.
    pub fn resolve_all(&self, lines: Option<&[String]>) -> Vec<ResolvedAnchor> {
        let resolutions = match lines {
            Some(lines) => resolve_all(&self.annotations, lines),
            None => resolve_unavailable(&self.annotations),
        };

        self.annotations
            .iter()
            .map(|annotation| {
                let resolution = resolutions
                    .get(&annotation.id)
                    .copied()
                    .unwrap_or(AnchorResolution::Unresolved);
                ResolvedAnchor {
                    id: annotation.id,
                    line: resolution.line(),
                    matched: resolution.is_matched(),
                }
            })
            .collect()
    }

    /// Runs one full reconciliation pass and applies it.
    pub fn reconcile(&mut self, lines: Option<&[String]>) -> ReconcileOutcome {
        let outcome = match lines {
            Some(lines) => {
                let resolutions = resolve_all(&self.annotations, lines);
                apply_resolutions(&mut self.annotations, &resolutions, lines)
            }
            None => {
                warn!(
                    "event=reconcile module=engine status=source_unavailable annotations={}",
                    self.annotations.len()
                );
                let resolutions = resolve_unavailable(&self.annotations);
                apply_resolutions(&mut self.annotations, &resolutions, &[] as &[String])
            }
        };
        self.policy.mark_reconciled();

        debug!(
            "event=reconcile module=engine status=ok annotations={} matched={} unresolved={} changed={} events={}",
            self.annotations.len(),
            outcome.matched,
            outcome.unresolved,
            outcome.changed,
            outcome.events.len()
        );
        outcome
    }

    /// Attaches a new annotation to `line` of the current text.
    pub fn create_annotation(
        &mut self,
        line: usize,
        body: impl Into<String>,
        lines: &[String],
        now_ms: i64,
    ) -> Result<AnnotationId, EngineError> {
        let text = self.anchor_text(line, lines, None)?;
        let annotation = Annotation::new(self.file_path.clone(), line, text, body, now_ms);
        let id = annotation.id;
        self.annotations.push(annotation);

        info!(
            "event=annotation_create module=engine status=ok annotation_id={} line={}",
            id, line
        );
        Ok(id)
    }

    /// Direct user edit: replaces the body and re-anchors to `line`.
    ///
    /// This is the only path that revives a record whose snapshot is missing.
    pub fn edit_annotation(
        &mut self,
        id: AnnotationId,
        body: impl Into<String>,
        line: usize,
        lines: &[String],
        now_ms: i64,
    ) -> Result<(), EngineError> {
        let text = self.anchor_text(line, lines, Some(id))?.to_string();
        let annotation = self.get_mut(id)?;
        annotation.body = body.into();
        annotation.stored_line = line;
        annotation.content_snapshot = Some(text);
        annotation.matched = true;
        annotation.updated_at = now_ms;

        info!(
            "event=annotation_edit module=engine status=ok annotation_id={} line={}",
            id, line
        );
        Ok(())
    }

    /// Replaces only the body; the anchor is left to reconciliation.
    pub fn update_body(
        &mut self,
        id: AnnotationId,
        body: impl Into<String>,
        now_ms: i64,
    ) -> Result<(), EngineError> {
        let annotation = self.get_mut(id)?;
        annotation.body = body.into();
        annotation.updated_at = now_ms;
        Ok(())
    }

    pub fn delete_annotation(&mut self, id: AnnotationId) -> Result<Annotation, EngineError> {
        let index = self
            .annotations
            .iter()
            .position(|annotation| annotation.id == id)
            .ok_or(EngineError::AnnotationNotFound(id))?;
        let removed = self.annotations.remove(index);
        info!(
            "event=annotation_delete module=engine status=ok annotation_id={}",
            id
        );
        Ok(removed)
    }

    /// Routes a change notification through the snapshot update policy.
    pub fn on_document_change(
        &mut self,
        event: &DocumentChangeEvent,
        recent_input: bool,
        lines: Option<&[String]>,
    ) -> ChangeOutcome {
        self.policy
            .on_document_change(event, recent_input, &mut self.annotations, lines)
    }

    /// Runs the pending reconciliation once its quiet window has elapsed.
    pub fn poll(&mut self, now_ms: i64, lines: Option<&[String]>) -> Option<ReconcileOutcome> {
        if self.policy.poll(now_ms) {
            Some(self.reconcile(lines))
        } else {
            None
        }
    }

    fn get_mut(&mut self, id: AnnotationId) -> Result<&mut Annotation, EngineError> {
        self.annotations
            .iter_mut()
            .find(|annotation| annotation.id == id)
            .ok_or(EngineError::AnnotationNotFound(id))
    }

    fn anchor_text<'a>(
        &self,
        line: usize,
        lines: &'a [String],
        editing: Option<AnnotationId>,
    ) -> Result<&'a str, EngineError> {
        if let Some(id) = editing {
            if self.get(id).is_none() {
                return Err(EngineError::AnnotationNotFound(id));
            }
        }

        let text = lines
            .get(line)
            .ok_or(EngineError::LineOutOfRange {
                line,
                line_count: lines.len(),
            })?
            .trim();
        if text.is_empty() {
            return Err(EngineError::EmptyAnchorLine(line));
        }

        if let Some(existing) = self.annotations.iter().find(|annotation| {
            annotation.matched && annotation.stored_line == line && Some(annotation.id) != editing
        }) {
            return Err(EngineError::LineAlreadyAnnotated {
                line,
                existing: existing.id,
            });
        }

        Ok(text)
    }
}
