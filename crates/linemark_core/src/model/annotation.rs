//! Annotation domain model.
//!
//! # Responsibility
//! - Define the record binding free text to one line of a text file.
//! - Own the persisted JSON shape (camelCase field names).
//!
//! # Invariants
//! - `id` is stable and never reused for another annotation.
//! - `stored_line` is meaningful only while `matched` is `true`.
//! - A missing or blank `content_snapshot` keeps the annotation unmatched
//!   until the user edits it directly.
//! - `matched` is derived on every reconciliation; a persisted `true` is not
//!   trusted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one annotation.
pub type AnnotationId = Uuid;

/// Persisted store shape: file path -> ordered annotation list.
pub type AnnotationsByFile = BTreeMap<String, Vec<Annotation>>;

/// Validation failures for annotation records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValidationError {
    /// Nil UUID cannot identify an annotation.
    NilId,
    /// File path is blank after trim.
    EmptyFilePath,
}

impl Display for AnnotationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "annotation id must not be nil"),
            Self::EmptyFilePath => write!(f, "annotation file path must not be blank"),
        }
    }
}

impl Error for AnnotationValidationError {}

/// One free-text note attached to a line of a text file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "AnnotationWire")]
pub struct Annotation {
    pub id: AnnotationId,
    /// Path of the annotated file, as handed in by the host.
    pub file_path: String,
    /// 0-based line index of the last confident anchor.
    pub stored_line: usize,
    /// Trimmed text of the line this annotation was last anchored to.
    pub content_snapshot: Option<String>,
    /// User text; may embed `$tag` declarations and `@tag` references.
    pub body: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds of the last direct user edit.
    pub updated_at: i64,
    pub matched: bool,
}

impl Annotation {
    /// Creates an annotation anchored to `line` with a generated id.
    ///
    /// `line_text` is trimmed into the content snapshot.
    pub fn new(
        file_path: impl Into<String>,
        line: usize,
        line_text: &str,
        body: impl Into<String>,
        now_ms: i64,
    ) -> Self {
        let snapshot = line_text.trim().to_string();
        let matched = !snapshot.is_empty();
        Self {
            id: Uuid::new_v4(),
            file_path: file_path.into(),
            stored_line: line,
            content_snapshot: Some(snapshot),
            body: body.into(),
            created_at: now_ms,
            updated_at: now_ms,
            matched,
        }
    }

    /// Creates an annotation with a caller-provided id.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(
        id: AnnotationId,
        file_path: impl Into<String>,
        line: usize,
        line_text: &str,
        body: impl Into<String>,
        now_ms: i64,
    ) -> Result<Self, AnnotationValidationError> {
        let mut annotation = Self::new(file_path, line, line_text, body, now_ms);
        annotation.id = id;
        annotation.validate()?;
        Ok(annotation)
    }

    /// Validates identity-level invariants.
    pub fn validate(&self) -> Result<(), AnnotationValidationError> {
        if self.id.is_nil() {
            return Err(AnnotationValidationError::NilId);
        }
        if self.file_path.trim().is_empty() {
            return Err(AnnotationValidationError::EmptyFilePath);
        }
        Ok(())
    }

    /// Returns the trimmed snapshot, or `None` for a missing/blank one.
    pub fn snapshot(&self) -> Option<&str> {
        self.content_snapshot
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Whether this record carries any text that could anchor it.
    pub fn has_anchor_content(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Line to render at, or `None` while unresolved.
    pub fn current_line(&self) -> Option<usize> {
        self.matched.then_some(self.stored_line)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotationWire {
    id: AnnotationId,
    file_path: String,
    #[serde(default)]
    stored_line: usize,
    #[serde(default)]
    content_snapshot: Option<String>,
    #[serde(default)]
    body: String,
    #[serde(default)]
    created_at: i64,
    #[serde(default)]
    updated_at: i64,
    #[serde(default)]
    matched: bool,
}

impl TryFrom<AnnotationWire> for Annotation {
    type Error = AnnotationValidationError;

    fn try_from(wire: AnnotationWire) -> Result<Self, Self::Error> {
        let mut annotation = Self {
            id: wire.id,
            file_path: wire.file_path,
            stored_line: wire.stored_line,
            content_snapshot: wire.content_snapshot,
            body: wire.body,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            matched: wire.matched,
        };
        // Legacy records without snapshot text can never have been anchored.
        if !annotation.has_anchor_content() {
            annotation.matched = false;
        }
        annotation.validate()?;
        Ok(annotation)
    }
}
