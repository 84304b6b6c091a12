//! In-memory store for hosts that persist elsewhere, and for tests.

use crate::model::annotation::AnnotationsByFile;
use crate::store::{validate_store, AnnotationStore, StoreResult};

/// Store keeping the last saved set in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryAnnotationStore {
    data: AnnotationsByFile,
    save_count: usize,
}

impl MemoryAnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: AnnotationsByFile) -> Self {
        Self {
            data,
            save_count: 0,
        }
    }

    /// Last saved (or seeded) content.
    pub fn data(&self) -> &AnnotationsByFile {
        &self.data
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl AnnotationStore for MemoryAnnotationStore {
    fn load(&self) -> StoreResult<AnnotationsByFile> {
        validate_store(&self.data)?;
        Ok(self.data.clone())
    }

    fn save(&mut self, annotations: &AnnotationsByFile) -> StoreResult<()> {
        validate_store(annotations)?;
        self.data = annotations.clone();
        self.save_count += 1;
        Ok(())
    }
}
