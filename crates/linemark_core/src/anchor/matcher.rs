//! Exact-text anchor search around an annotation's stored line.

use crate::anchor::gate::{check_specificity, search_radius};
use crate::model::annotation::Annotation;
use log::trace;
use std::collections::BTreeSet;

/// Outcome of resolving one annotation against a document snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorResolution {
    /// Anchored to this 0-based line.
    Matched(usize),
    /// No reliable line found; surfaced to callers, never guessed.
    Unresolved,
}

impl AnchorResolution {
    pub fn line(self) -> Option<usize> {
        match self {
            Self::Matched(line) => Some(line),
            Self::Unresolved => None,
        }
    }

    pub fn is_matched(self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// Resolves `annotation` inside `lines` with no lines pre-claimed.
pub fn resolve<L: AsRef<str>>(annotation: &Annotation, lines: &[L]) -> AnchorResolution {
    resolve_excluding(annotation, lines, &BTreeSet::new())
}

/// Resolves `annotation` inside `lines`, never returning a line in `claimed`.
///
/// Search order: stored line, stored line - 1, stored line + 1, then a
/// symmetric window (lower side first at each distance) bounded by
/// [`search_radius`].
pub fn resolve_excluding<L: AsRef<str>>(
    annotation: &Annotation,
    lines: &[L],
    claimed: &BTreeSet<usize>,
) -> AnchorResolution {
    let Some(snapshot) = annotation.snapshot() else {
        return AnchorResolution::Unresolved;
    };
    if let Err(reason) = check_specificity(snapshot) {
        trace!(
            "event=anchor_resolve module=anchor status=gated annotation_id={} reason={}",
            annotation.id,
            reason
        );
        return AnchorResolution::Unresolved;
    }

    let stored = annotation.stored_line;
    let is_free_match =
        |line: usize| !claimed.contains(&line) && line_matches(lines, line, snapshot);

    if is_free_match(stored) {
        return AnchorResolution::Matched(stored);
    }

    let radius = search_radius(snapshot, lines.len());
    for distance in 1..=radius {
        let before = stored.checked_sub(distance);
        let after = stored.checked_add(distance);
        for candidate in [before, after].into_iter().flatten() {
            if is_free_match(candidate) {
                return AnchorResolution::Matched(candidate);
            }
        }
    }

    AnchorResolution::Unresolved
}

/// Whether `annotation` passes the gate and its snapshot equals `lines[line]`.
pub fn matches_at<L: AsRef<str>>(annotation: &Annotation, lines: &[L], line: usize) -> bool {
    match annotation.snapshot() {
        Some(snapshot) => check_specificity(snapshot).is_ok() && line_matches(lines, line, snapshot),
        None => false,
    }
}

fn line_matches<L: AsRef<str>>(lines: &[L], line: usize, snapshot: &str) -> bool {
    lines
        .get(line)
        .is_some_and(|text| text.as_ref().trim() == snapshot)
}
