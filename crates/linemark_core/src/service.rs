//! Annotation use-case service.
//!
//! # Responsibility
//! - Load the store once and route each file to its own `FileEngine`.
//! - Keep the tag graph rebuilt after every change to the annotation set.
//! - Persist only after a net change; queue notifications for the host.
//!
//! # Invariants
//! - Service APIs never bypass engine validation.
//! - Reconciliation for one file never interleaves with another operation on
//!   the same file (`&mut self` everywhere that mutates).

use crate::config::EngineConfig;
use crate::engine::{EngineError, FileEngine, ResolvedAnchor};
use crate::event::EngineEvent;
use crate::model::annotation::{Annotation, AnnotationId, AnnotationsByFile};
use crate::model::tag::{Declaration, Reference};
use crate::policy::{ChangeOutcome, DebounceState, DocumentChangeEvent, RecentInputTracker};
use crate::reconcile::ReconcileOutcome;
use crate::source::TextSnapshotSource;
use crate::store::{AnnotationStore, StoreError};
use crate::tags::TagGraph;
use log::{error, info};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for annotation use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Store(StoreError),
    Engine(EngineError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Engine(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Engine(err) => Some(err),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<EngineError> for ServiceError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Facade over per-file engines, the store, and the tag graph.
pub struct AnnotationService<S: AnnotationStore> {
    store: S,
    config: EngineConfig,
    engines: BTreeMap<String, FileEngine>,
    tags: TagGraph,
    events: Vec<EngineEvent>,
    input: RecentInputTracker,
}

impl<S: AnnotationStore> AnnotationService<S> {
    /// Loads every file's annotations from `store`.
    pub fn open(store: S, config: EngineConfig) -> Result<Self, ServiceError> {
        let loaded = store.load()?;
        let engines = loaded
            .into_iter()
            .map(|(file_path, annotations)| {
                let engine = FileEngine::new(file_path.clone(), annotations, &config);
                (file_path, engine)
            })
            .collect::<BTreeMap<_, _>>();

        let input = RecentInputTracker::new(config.input_recency_ms);
        let mut service = Self {
            store,
            config,
            engines,
            tags: TagGraph::default(),
            events: Vec::new(),
            input,
        };
        service.rebuild_tags();
        info!(
            "event=service_open module=service status=ok files={}",
            service.engines.len()
        );
        Ok(service)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Annotations of `file_path` in stored order; empty for unknown files.
    pub fn annotations(&self, file_path: &str) -> &[Annotation] {
        self.engines
            .get(file_path)
            .map(FileEngine::annotations)
            .unwrap_or(&[])
    }

    /// Current annotation set in persisted shape, omitting empty files.
    pub fn snapshot(&self) -> AnnotationsByFile {
        self.engines
            .iter()
            .filter(|(_, engine)| !engine.annotations().is_empty())
            .map(|(file_path, engine)| (file_path.clone(), engine.annotations().to_vec()))
            .collect()
    }

    /// Resolution of every annotation of `file_path`, for rendering.
    pub fn resolve_all(
        &self,
        file_path: &str,
        source: &impl TextSnapshotSource,
    ) -> Vec<ResolvedAnchor> {
        match self.engines.get(file_path) {
            Some(engine) => engine.resolve_all(source.lines(file_path).as_deref()),
            None => Vec::new(),
        }
    }

    /// Runs an immediate reconciliation pass, e.g. when a file is opened.
    pub fn reconcile_file(
        &mut self,
        file_path: &str,
        source: &impl TextSnapshotSource,
    ) -> Result<ReconcileOutcome, ServiceError> {
        let lines = source.lines(file_path);
        let Some(engine) = self.engines.get_mut(file_path) else {
            return Ok(ReconcileOutcome::default());
        };
        let outcome = engine.reconcile(lines.as_deref());
        self.finish_reconcile(&outcome)?;
        Ok(outcome)
    }

    pub fn create_annotation(
        &mut self,
        file_path: &str,
        line: usize,
        body: impl Into<String>,
        source: &impl TextSnapshotSource,
        now_ms: i64,
    ) -> Result<AnnotationId, ServiceError> {
        let lines = source
            .lines(file_path)
            .ok_or_else(|| EngineError::SourceUnavailable(file_path.to_string()))?;
        let engine = self
            .engines
            .entry(file_path.to_string())
            .or_insert_with(|| FileEngine::new(file_path, Vec::new(), &self.config));
        let id = engine.create_annotation(line, body, &lines, now_ms)?;
        self.finish_set_change()?;
        Ok(id)
    }

    /// Direct user edit of an annotation's body and anchor line.
    pub fn edit_annotation(
        &mut self,
        id: AnnotationId,
        body: impl Into<String>,
        line: usize,
        source: &impl TextSnapshotSource,
        now_ms: i64,
    ) -> Result<(), ServiceError> {
        let file_path = self.file_of(id)?;
        let lines = source
            .lines(&file_path)
            .ok_or_else(|| EngineError::SourceUnavailable(file_path.clone()))?;
        self.engine_mut(&file_path)?
            .edit_annotation(id, body, line, &lines, now_ms)?;
        self.finish_set_change()
    }

    pub fn update_body(
        &mut self,
        id: AnnotationId,
        body: impl Into<String>,
        now_ms: i64,
    ) -> Result<(), ServiceError> {
        let file_path = self.file_of(id)?;
        self.engine_mut(&file_path)?.update_body(id, body, now_ms)?;
        self.finish_set_change()
    }

    pub fn delete_annotation(&mut self, id: AnnotationId) -> Result<Annotation, ServiceError> {
        let file_path = self.file_of(id)?;
        let removed = self.engine_mut(&file_path)?.delete_annotation(id)?;
        self.finish_set_change()?;
        Ok(removed)
    }

    /// Handles a change notification for `file_path`.
    pub fn on_document_change(
        &mut self,
        file_path: &str,
        event: &DocumentChangeEvent,
        recent_input: bool,
        source: &impl TextSnapshotSource,
    ) -> Result<ChangeOutcome, ServiceError> {
        let Some(engine) = self.engines.get_mut(file_path) else {
            return Ok(ChangeOutcome::default());
        };
        let lines = if recent_input {
            source.lines(file_path)
        } else {
            None
        };
        let outcome = engine.on_document_change(event, recent_input, lines.as_deref());
        if outcome.changed() {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Records a genuine interactive input (keystroke, paste, command).
    pub fn record_input(&mut self, at_ms: i64) {
        self.input.record_input(at_ms);
    }

    /// Like [`Self::on_document_change`], deriving the recent-input signal
    /// from inputs recorded via [`Self::record_input`].
    pub fn on_tracked_change(
        &mut self,
        file_path: &str,
        event: &DocumentChangeEvent,
        source: &impl TextSnapshotSource,
    ) -> Result<ChangeOutcome, ServiceError> {
        let recent_input = self.input.is_recent(event.timestamp_ms);
        self.on_document_change(file_path, event, recent_input, source)
    }

    /// Runs every reconciliation whose quiet window elapsed by `now_ms`.
    pub fn poll(
        &mut self,
        now_ms: i64,
        source: &impl TextSnapshotSource,
    ) -> Result<ReconcileOutcome, ServiceError> {
        let mut total = ReconcileOutcome::default();
        let mut ran = false;
        for (file_path, engine) in self.engines.iter_mut() {
            if !engine.policy().is_pending() {
                continue;
            }
            let lines = source.lines(file_path);
            if let Some(outcome) = engine.poll(now_ms, lines.as_deref()) {
                total.merge(outcome);
                ran = true;
            }
        }
        if ran {
            self.finish_reconcile(&total)?;
        }
        Ok(total)
    }

    /// Earliest pending reconciliation deadline across files, if any.
    pub fn next_deadline(&self) -> Option<i64> {
        self.engines
            .values()
            .filter_map(|engine| match engine.policy().state() {
                DebounceState::PendingReconcile { deadline_ms } => Some(deadline_ms),
                DebounceState::Idle => None,
            })
            .min()
    }

    /// Takes queued repositioned/unresolved notifications.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn tags(&self) -> &TagGraph {
        &self.tags
    }

    pub fn declaration_of(&self, tag_name: &str) -> Option<&Declaration> {
        self.tags.declaration_of(tag_name)
    }

    pub fn references_of(&self, tag_name: &str) -> &[Reference] {
        self.tags.references_of(tag_name)
    }

    pub fn all_declared_names(&self) -> Vec<&str> {
        self.tags.all_declared_names()
    }

    pub fn reference_at(&self, file_path: &str, line: usize, offset: usize) -> Option<&Reference> {
        self.tags.reference_at(file_path, line, offset)
    }

    fn file_of(&self, id: AnnotationId) -> Result<String, EngineError> {
        self.engines
            .iter()
            .find(|(_, engine)| engine.get(id).is_some())
            .map(|(file_path, _)| file_path.clone())
            .ok_or(EngineError::AnnotationNotFound(id))
    }

    fn engine_mut(&mut self, file_path: &str) -> Result<&mut FileEngine, EngineError> {
        self.engines
            .get_mut(file_path)
            .ok_or_else(|| EngineError::SourceUnavailable(file_path.to_string()))
    }

    /// Matched flags may flip without a persisted change, so tags are
    /// rebuilt after every pass.
    fn finish_reconcile(&mut self, outcome: &ReconcileOutcome) -> Result<(), ServiceError> {
        self.events.extend(outcome.events.iter().cloned());
        self.rebuild_tags();
        if outcome.changed {
            self.persist()?;
        }
        Ok(())
    }

    fn finish_set_change(&mut self) -> Result<(), ServiceError> {
        self.rebuild_tags();
        self.persist()
    }

    fn rebuild_tags(&mut self) {
        self.tags = TagGraph::rebuild(&self.snapshot());
    }

    fn persist(&mut self) -> Result<(), ServiceError> {
        let snapshot = self.snapshot();
        self.store.save(&snapshot).map_err(|err| {
            error!(
                "event=persist module=service status=error files={} error={}",
                snapshot.len(),
                err
            );
            ServiceError::Store(err)
        })
    }
}
