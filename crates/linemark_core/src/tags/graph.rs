//! Tag graph construction and queries.

use crate::model::annotation::{Annotation, AnnotationsByFile};
use crate::model::tag::{Declaration, Reference, TagSpan};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static DECLARATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("valid declaration regex"));
static REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z_][A-Za-z0-9_]*)").expect("valid reference regex"));

/// Immutable snapshot of all tag declarations and references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagGraph {
    declarations: BTreeMap<String, Declaration>,
    references: BTreeMap<String, Vec<Reference>>,
}

impl TagGraph {
    /// Builds the index from every annotation of every file.
    ///
    /// Annotations are processed in ascending `(updated_at, id)` order, so a
    /// redeclared name ends up bound to its most recently written declaration.
    pub fn rebuild(annotations_by_file: &AnnotationsByFile) -> Self {
        let mut ordered = annotations_by_file
            .values()
            .flatten()
            .collect::<Vec<&Annotation>>();
        ordered.sort_by(|a, b| a.updated_at.cmp(&b.updated_at).then(a.id.cmp(&b.id)));

        let mut graph = Self::default();
        let mut redeclared = 0usize;
        for annotation in ordered {
            for caps in DECLARATION_RE.captures_iter(&annotation.body) {
                let Some(name) = caps.get(1) else { continue };
                let declaration = Declaration {
                    tag_name: name.as_str().to_string(),
                    file_path: annotation.file_path.clone(),
                    line: annotation.current_line(),
                    annotation_id: annotation.id,
                };
                if graph
                    .declarations
                    .insert(declaration.tag_name.clone(), declaration)
                    .is_some()
                {
                    redeclared += 1;
                }
            }

            for caps in REFERENCE_RE.captures_iter(&annotation.body) {
                let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                graph
                    .references
                    .entry(name.as_str().to_string())
                    .or_default()
                    .push(Reference {
                        tag_name: name.as_str().to_string(),
                        file_path: annotation.file_path.clone(),
                        line: annotation.current_line(),
                        annotation_id: annotation.id,
                        span: TagSpan {
                            start: whole.start(),
                            end: whole.end(),
                        },
                    });
            }
        }

        if redeclared > 0 {
            warn!(
                "event=tag_rebuild module=tags status=redeclared count={}",
                redeclared
            );
        }
        debug!(
            "event=tag_rebuild module=tags status=ok declarations={} referenced_names={}",
            graph.declarations.len(),
            graph.references.len()
        );
        graph
    }

    pub fn declaration_of(&self, tag_name: &str) -> Option<&Declaration> {
        self.declarations.get(tag_name)
    }

    /// All references to `tag_name`, declared or not.
    pub fn references_of(&self, tag_name: &str) -> &[Reference] {
        self.references
            .get(tag_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Declared names in ascending order.
    pub fn all_declared_names(&self) -> Vec<&str> {
        self.declarations.keys().map(String::as_str).collect()
    }

    /// Reference under a cursor at byte `offset` of the body of an annotation
    /// shown at `file_path:line`. Unresolved annotations are shown nowhere.
    pub fn reference_at(&self, file_path: &str, line: usize, offset: usize) -> Option<&Reference> {
        self.references.values().flatten().find(|reference| {
            reference.file_path == file_path
                && reference.line == Some(line)
                && reference.span.contains(offset)
        })
    }

    /// Declared names starting with `prefix`, ascending.
    pub fn completions(&self, prefix: &str) -> Vec<&str> {
        self.declarations
            .range(prefix.to_string()..)
            .map(|(name, _)| name.as_str())
            .take_while(|name| name.starts_with(prefix))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.references.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::TagGraph;
    use crate::model::annotation::{Annotation, AnnotationsByFile};

    #[test]
    fn ignores_markers_without_identifier_start() {
        let mut by_file = AnnotationsByFile::new();
        by_file.insert(
            "a.rs".to_string(),
            vec![Annotation::new("a.rs", 0, "fn a()", "costs $5 @9lives $ok", 1)],
        );
        let graph = TagGraph::rebuild(&by_file);
        assert_eq!(graph.all_declared_names(), vec!["ok"]);
        assert!(graph.references_of("9lives").is_empty());
    }

    #[test]
    fn completions_filter_by_prefix() {
        let mut by_file = AnnotationsByFile::new();
        by_file.insert(
            "a.rs".to_string(),
            vec![Annotation::new(
                "a.rs",
                0,
                "fn a()",
                "$parse_args $parse_env $render",
                1,
            )],
        );
        let graph = TagGraph::rebuild(&by_file);
        assert_eq!(graph.completions("parse"), vec!["parse_args", "parse_env"]);
        assert!(graph.completions("zzz").is_empty());
        assert_eq!(graph.completions("").len(), 3);
    }
}
