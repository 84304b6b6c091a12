//! JSON file store: one object mapping file path to annotation list.

use crate::model::annotation::AnnotationsByFile;
use crate::store::{validate_store, AnnotationStore, StoreResult};
use log::{error, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Annotation store backed by a single JSON document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileAnnotationStore {
    path: PathBuf,
}

impl JsonFileAnnotationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|value| value.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl AnnotationStore for JsonFileAnnotationStore {
    /// A missing file loads as an empty store.
    fn load(&self) -> StoreResult<AnnotationsByFile> {
        let started_at = Instant::now();
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=store_load module=store status=ok mode=json files=0 missing=true");
                return Ok(AnnotationsByFile::new());
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error mode=json error_code=read_failed error={}",
                    err
                );
                return Err(err.into());
            }
        };

        let annotations: AnnotationsByFile = serde_json::from_str(&text).map_err(|err| {
            error!(
                "event=store_load module=store status=error mode=json error_code=decode_failed error={}",
                err
            );
            err
        })?;
        validate_store(&annotations)?;

        info!(
            "event=store_load module=store status=ok mode=json files={} duration_ms={}",
            annotations.len(),
            started_at.elapsed().as_millis()
        );
        Ok(annotations)
    }

    /// Writes a sibling temp file and renames it over the store.
    fn save(&mut self, annotations: &AnnotationsByFile) -> StoreResult<()> {
        validate_store(annotations)?;
        let started_at = Instant::now();
        let text = serde_json::to_string_pretty(annotations)?;
        let temp_path = self.temp_path();

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&temp_path, text)?;
        if let Err(err) = std::fs::rename(&temp_path, &self.path) {
            error!(
                "event=store_save module=store status=error mode=json error_code=rename_failed error={}",
                err
            );
            let _ = std::fs::remove_file(&temp_path);
            return Err(err.into());
        }

        info!(
            "event=store_save module=store status=ok mode=json files={} duration_ms={}",
            annotations.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}
