//! Tag records derived from annotation bodies.
//!
//! `$name` declares a tag at the annotation's line; `@name` references it.
//! Both are plain values produced by a full rebuild and never mutated.

use crate::model::annotation::AnnotationId;
use std::ops::Range;

/// Byte range of a tag marker inside an annotation body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagSpan {
    pub start: usize,
    pub end: usize,
}

impl TagSpan {
    /// Whether a cursor at `offset` sits on or directly after this marker.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Live declaration of a tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub tag_name: String,
    pub file_path: String,
    /// `None` while the owning annotation is unresolved.
    pub line: Option<usize>,
    pub annotation_id: AnnotationId,
}

/// One `@name` occurrence; may point at no declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub tag_name: String,
    pub file_path: String,
    /// `None` while the owning annotation is unresolved.
    pub line: Option<usize>,
    pub annotation_id: AnnotationId,
    pub span: TagSpan,
}
