//! Annotation persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the load/save boundary used by the service layer.
//! - Keep the persisted shape one JSON object keyed by file path.
//!
//! # Invariants
//! - Loaded records are validated; invalid stores are rejected, not masked.
//! - Every annotation is listed under the key equal to its `file_path`.
//! - Annotation ids are unique across the whole store.

use crate::model::annotation::{AnnotationId, AnnotationValidationError, AnnotationsByFile};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileAnnotationStore;
pub use memory::MemoryAnnotationStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer error for IO, decoding, and consistency failures.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Validation(AnnotationValidationError),
    /// Store content decoded but breaks a store invariant.
    Invalid(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "annotation store io failed: {err}"),
            Self::Json(err) => write!(f, "annotation store json invalid: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Invalid(message) => write!(f, "invalid annotation store: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<AnnotationValidationError> for StoreError {
    fn from(value: AnnotationValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Load/save boundary for the full annotation set.
pub trait AnnotationStore {
    /// Loads every file's annotations.
    fn load(&self) -> StoreResult<AnnotationsByFile>;
    /// Replaces the persisted set with `annotations`.
    fn save(&mut self, annotations: &AnnotationsByFile) -> StoreResult<()>;
}

/// Checks store-level invariants shared by all backends.
pub fn validate_store(annotations: &AnnotationsByFile) -> StoreResult<()> {
    let mut seen = BTreeSet::<AnnotationId>::new();
    for (file_path, list) in annotations {
        for annotation in list {
            annotation.validate()?;
            if &annotation.file_path != file_path {
                return Err(StoreError::Invalid(format!(
                    "annotation {} filed under `{file_path}` but points at `{}`",
                    annotation.id, annotation.file_path
                )));
            }
            if !seen.insert(annotation.id) {
                return Err(StoreError::Invalid(format!(
                    "duplicate annotation id {}",
                    annotation.id
                )));
            }
        }
    }
    Ok(())
}
