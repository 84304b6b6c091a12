//! Batch reconciler built on the single-annotation matcher.

use crate::anchor::matcher::{matches_at, resolve_excluding, AnchorResolution};
use crate::event::EngineEvent;
use crate::model::annotation::{Annotation, AnnotationId};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Net effect of applying one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// `true` when any `stored_line` or `content_snapshot` changed.
    pub changed: bool,
    pub matched: usize,
    pub unresolved: usize,
    pub events: Vec<EngineEvent>,
}

impl ReconcileOutcome {
    /// Folds `other` into `self`.
    pub fn merge(&mut self, other: ReconcileOutcome) {
        self.changed |= other.changed;
        self.matched += other.matched;
        self.unresolved += other.unresolved;
        self.events.extend(other.events);
    }
}

/// Resolves all `annotations` of one file against `lines`.
///
/// Deterministic: identical inputs always produce identical assignments.
pub fn resolve_all<L: AsRef<str>>(
    annotations: &[Annotation],
    lines: &[L],
) -> BTreeMap<AnnotationId, AnchorResolution> {
    let mut claimed = BTreeSet::new();
    let mut resolutions = BTreeMap::new();

    for index in processing_order(annotations, lines) {
        let annotation = &annotations[index];
        let resolution = resolve_excluding(annotation, lines, &claimed);
        if let AnchorResolution::Matched(line) = resolution {
            claimed.insert(line);
        }
        resolutions.insert(annotation.id, resolution);
    }

    resolutions
}

/// Reports every annotation as unresolved; used when no text is available.
pub fn resolve_unavailable(annotations: &[Annotation]) -> BTreeMap<AnnotationId, AnchorResolution> {
    annotations
        .iter()
        .map(|annotation| (annotation.id, AnchorResolution::Unresolved))
        .collect()
}

/// Writes `resolutions` back into `annotations`.
///
/// For each newly matched annotation, `stored_line` follows the resolved line
/// and `content_snapshot` is refreshed only when the live text differs.
/// Annotations missing from `resolutions` are treated as unresolved.
pub fn apply_resolutions<L: AsRef<str>>(
    annotations: &mut [Annotation],
    resolutions: &BTreeMap<AnnotationId, AnchorResolution>,
    lines: &[L],
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    for annotation in annotations.iter_mut() {
        let resolution = resolutions
            .get(&annotation.id)
            .copied()
            .unwrap_or(AnchorResolution::Unresolved);

        match resolution {
            AnchorResolution::Matched(line) => {
                let live = lines.get(line).map(|text| text.as_ref().trim());
                if let Some(live) = live {
                    if annotation.content_snapshot.as_deref() != Some(live) {
                        annotation.content_snapshot = Some(live.to_string());
                        outcome.changed = true;
                    }
                }
                if annotation.stored_line != line {
                    outcome.events.push(EngineEvent::AnnotationRepositioned {
                        id: annotation.id,
                        file_path: annotation.file_path.clone(),
                        old_line: annotation.stored_line,
                        new_line: line,
                    });
                    annotation.stored_line = line;
                    outcome.changed = true;
                }
                annotation.matched = true;
                outcome.matched += 1;
            }
            AnchorResolution::Unresolved => {
                if annotation.matched {
                    outcome.events.push(EngineEvent::AnnotationUnresolved {
                        id: annotation.id,
                        file_path: annotation.file_path.clone(),
                    });
                }
                annotation.matched = false;
                outcome.unresolved += 1;
            }
        }
    }

    debug!(
        "event=reconcile_apply module=reconcile status=ok matched={} unresolved={} changed={}",
        outcome.matched, outcome.unresolved, outcome.changed
    );
    outcome
}

fn processing_order<L: AsRef<str>>(annotations: &[Annotation], lines: &[L]) -> Vec<usize> {
    let mut order = (0..annotations.len()).collect::<Vec<_>>();
    let stable = annotations
        .iter()
        .map(|annotation| matches_at(annotation, lines, annotation.stored_line))
        .collect::<Vec<_>>();

    order.sort_by(|&left, &right| {
        let (a, b) = (&annotations[left], &annotations[right]);
        stable[right]
            .cmp(&stable[left])
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
    order
}
