//! Document change notifications as delivered by the host editor.

/// One edited range. Lines are 0-based and refer to the pre-edit document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    pub start_line: usize,
    pub end_line: usize,
    pub inserted_text: String,
}

impl LineChange {
    pub fn new(start_line: usize, end_line: usize, inserted_text: impl Into<String>) -> Self {
        Self {
            start_line,
            end_line,
            inserted_text: inserted_text.into(),
        }
    }

    /// Edit confined to one line that inserts no newline.
    pub fn in_line(line: usize, inserted_text: impl Into<String>) -> Self {
        Self::new(line, line, inserted_text)
    }

    pub fn kind(&self) -> ChangeKind {
        if self.start_line == self.end_line && !self.inserted_text.contains('\n') {
            ChangeKind::LineCountPreserving
        } else {
            ChangeKind::Structural
        }
    }
}

/// How a change affects line indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Single line, no inserted newline: indexes do not move.
    LineCountPreserving,
    /// Spans lines or inserts a newline: indexes may move.
    Structural,
}

/// Batch of edited ranges observed at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChangeEvent {
    pub changes: Vec<LineChange>,
    /// Unix epoch milliseconds.
    pub timestamp_ms: i64,
}

impl DocumentChangeEvent {
    pub fn new(changes: Vec<LineChange>, timestamp_ms: i64) -> Self {
        Self {
            changes,
            timestamp_ms,
        }
    }

    pub fn is_structural(&self) -> bool {
        self.changes
            .iter()
            .any(|change| change.kind() == ChangeKind::Structural)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeKind, DocumentChangeEvent, LineChange};

    #[test]
    fn classifies_changes_by_line_effect() {
        assert_eq!(
            LineChange::in_line(4, "renamed").kind(),
            ChangeKind::LineCountPreserving
        );
        assert_eq!(LineChange::in_line(4, "a\nb").kind(), ChangeKind::Structural);
        assert_eq!(LineChange::new(4, 6, "").kind(), ChangeKind::Structural);
    }

    #[test]
    fn event_is_structural_when_any_change_is() {
        let event = DocumentChangeEvent::new(
            vec![LineChange::in_line(1, "x"), LineChange::new(2, 3, "")],
            0,
        );
        assert!(event.is_structural());
        assert!(!DocumentChangeEvent::new(vec![LineChange::in_line(1, "x")], 0).is_structural());
    }
}
