//! Decides how each document change touches annotation snapshots.

use crate::config::EngineConfig;
use crate::model::annotation::{Annotation, AnnotationId};
use crate::policy::change::DocumentChangeEvent;
use crate::policy::debounce::{DebounceState, Debouncer};
use log::{debug, info};

/// What one change notification did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeOutcome {
    /// Change arrived without recent user input and was ignored.
    pub suppressed: bool,
    /// Annotations whose snapshot was refreshed in place.
    pub refreshed: Vec<AnnotationId>,
    /// A reconciliation is now pending.
    pub reconcile_scheduled: bool,
}

impl ChangeOutcome {
    /// `true` when any annotation was mutated.
    pub fn changed(&self) -> bool {
        !self.refreshed.is_empty()
    }
}

/// Per-file policy owning the debounce timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotUpdatePolicy {
    debouncer: Debouncer,
    /// Set by a suppressed change; stored lines may not describe the current
    /// text until the next reconciliation runs.
    stale: bool,
}

impl SnapshotUpdatePolicy {
    pub fn new(debounce_ms: i64) -> Self {
        Self {
            debouncer: Debouncer::new(debounce_ms),
            stale: false,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.debounce_ms)
    }

    pub fn state(&self) -> DebounceState {
        self.debouncer.state()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Whether a suppressed change arrived since the last reconciliation.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Clears the stale mark once a reconciliation pass has run.
    pub fn mark_reconciled(&mut self) {
        self.stale = false;
    }

    /// Handles one change notification.
    ///
    /// - `recent_input == false`: nothing is mutated, a pending
    ///   reconciliation is dropped, and the policy turns stale.
    /// - In-line edits with no reconciliation pending refresh the snapshot of
    ///   matched annotations sitting on the edited line, from `live_lines`.
    /// - Structural edits, and any edit while a reconciliation is pending or
    ///   the policy is stale, (re)start the debounce deadline.
    pub fn on_document_change<L: AsRef<str>>(
        &mut self,
        event: &DocumentChangeEvent,
        recent_input: bool,
        annotations: &mut [Annotation],
        live_lines: Option<&[L]>,
    ) -> ChangeOutcome {
        let mut outcome = ChangeOutcome::default();

        if !recent_input {
            let dropped = self.debouncer.cancel();
            self.stale = true;
            info!(
                "event=document_change module=policy status=suppressed changes={} dropped_pending={}",
                event.changes.len(),
                dropped
            );
            outcome.suppressed = true;
            return outcome;
        }

        // Stored lines are stale until a pass runs; in-place refresh could
        // then write an unrelated line into a snapshot.
        if event.is_structural() || self.debouncer.is_pending() || self.stale {
            let restarted = self.debouncer.edit_observed(event.timestamp_ms);
            debug!(
                "event=document_change module=policy status=scheduled restarted={} stale={} state={:?}",
                restarted,
                self.stale,
                self.debouncer.state()
            );
            outcome.reconcile_scheduled = true;
            return outcome;
        }

        let Some(lines) = live_lines else {
            return outcome;
        };

        for change in &event.changes {
            let Some(live) = lines.get(change.start_line).map(|text| text.as_ref().trim()) else {
                continue;
            };
            if live.is_empty() {
                continue;
            }

            for annotation in annotations.iter_mut().filter(|annotation| {
                annotation.matched && annotation.stored_line == change.start_line
            }) {
                if annotation.content_snapshot.as_deref() != Some(live) {
                    annotation.content_snapshot = Some(live.to_string());
                    outcome.refreshed.push(annotation.id);
                }
            }
        }

        if outcome.changed() {
            debug!(
                "event=snapshot_refresh module=policy status=ok refreshed={}",
                outcome.refreshed.len()
            );
        }
        outcome
    }

    /// Returns `true` exactly once when the pending deadline has passed.
    ///
    /// The caller must then reconcile; the stale mark is cleared here.
    pub fn poll(&mut self, now_ms: i64) -> bool {
        let fired = self.debouncer.deadline_elapsed(now_ms);
        if fired {
            self.stale = false;
        }
        fired
    }

    /// Drops any pending reconciliation.
    pub fn cancel(&mut self) -> bool {
        self.debouncer.cancel()
    }
}
