//! Current-text collaborator contract.
//!
//! The engine never reads files; hosts hand in line arrays through
//! [`TextSnapshotSource`]. `None` means the text is unavailable and every
//! annotation of that file must be reported unresolved.

use std::collections::BTreeMap;

/// Supplies the ordered current lines of a file.
pub trait TextSnapshotSource {
    fn lines(&self, file_path: &str) -> Option<Vec<String>>;
}

/// Splits text into lines, accepting `\n` and `\r\n` endings.
///
/// A trailing newline does not produce an extra empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Text source holding documents in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTextSource {
    documents: BTreeMap<String, Vec<String>>,
}

impl MemoryTextSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the content of `file_path`.
    pub fn set_text(&mut self, file_path: impl Into<String>, text: &str) {
        self.documents.insert(file_path.into(), split_lines(text));
    }

    pub fn set_lines(&mut self, file_path: impl Into<String>, lines: Vec<String>) {
        self.documents.insert(file_path.into(), lines);
    }

    /// Makes `file_path` unavailable.
    pub fn remove(&mut self, file_path: &str) {
        self.documents.remove(file_path);
    }
}

impl TextSnapshotSource for MemoryTextSource {
    fn lines(&self, file_path: &str) -> Option<Vec<String>> {
        self.documents.get(file_path).cloned()
    }
}
