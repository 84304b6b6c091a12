//! CLI smoke entry point.
//!
//! # Responsibility
//! - Resolve the annotations of one file from a JSON store and print them.
//! - Act as the host collaborator: it is the only place that reads files.
//!
//! Usage: `linemark_cli <store.json> <file> [config.json]`

use linemark_core::{
    split_lines, AnnotationService, EngineConfig, JsonFileAnnotationStore, TextSnapshotSource,
};
use log::warn;
use std::process::ExitCode;

struct FsTextSource;

impl TextSnapshotSource for FsTextSource {
    fn lines(&self, file_path: &str) -> Option<Vec<String>> {
        match std::fs::read_to_string(file_path) {
            Ok(text) => Some(split_lines(&text)),
            Err(err) => {
                warn!("event=source_read module=cli status=unavailable error={err}");
                None
            }
        }
    }
}

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let (store_path, file_path) = match args.as_slice() {
        [store_path, file_path, ..] => (store_path.as_str(), file_path.as_str()),
        _ => {
            eprintln!("usage: linemark_cli <store.json> <file> [config.json]");
            return ExitCode::from(2);
        }
    };

    let config = match args.get(2) {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("linemark_cli: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };
    if config.logging.log_dir.is_some() {
        if let Err(err) = linemark_core::init_logging(&config.logging) {
            eprintln!("linemark_cli: {err}");
        }
    }

    let service = match AnnotationService::open(JsonFileAnnotationStore::new(store_path), config) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("linemark_cli: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("linemark_core version={}", linemark_core::core_version());
    for row in service.resolve_all(file_path, &FsTextSource) {
        match row.line {
            Some(line) => println!("{} line={} matched=true", row.id, line + 1),
            None => println!("{} line=- matched=false", row.id),
        }
    }
    ExitCode::SUCCESS
}
