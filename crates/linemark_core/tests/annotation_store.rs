use linemark_core::{
    Annotation, AnnotationStore, AnnotationsByFile, JsonFileAnnotationStore,
    MemoryAnnotationStore, StoreError,
};
use uuid::Uuid;

fn sample() -> AnnotationsByFile {
    let mut by_file = AnnotationsByFile::new();
    by_file.insert(
        "src/main.rs".to_string(),
        vec![Annotation::new(
            "src/main.rs",
            4,
            "  fn main() {",
            "entry $main",
            1_700_000_000_000,
        )],
    );
    by_file
}

#[test]
fn missing_file_loads_as_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAnnotationStore::new(dir.path().join("annotations.json"));
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn saved_store_uses_path_keyed_camel_case_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("annotations.json");
    let mut store = JsonFileAnnotationStore::new(&path);
    let data = sample();
    store.save(&data).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let record = &raw["src/main.rs"][0];
    assert_eq!(record["filePath"], "src/main.rs");
    assert_eq!(record["storedLine"], 4);
    assert_eq!(record["contentSnapshot"], "fn main() {");
    assert_eq!(record["body"], "entry $main");
    assert_eq!(record["createdAt"], 1_700_000_000_000_i64);
    assert_eq!(record["matched"], true);
    assert!(!dir.path().join("nested").join("annotations.json.tmp").exists());

    assert_eq!(store.load().unwrap(), data);
}

#[test]
fn legacy_record_without_snapshot_loads_unmatched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("annotations.json");
    let id = Uuid::new_v4();
    let json = serde_json::json!({
        "src/old.rs": [{
            "id": id.to_string(),
            "filePath": "src/old.rs",
            "storedLine": 3,
            "body": "legacy",
            "createdAt": 1,
            "updatedAt": 1,
            "matched": true
        }]
    });
    std::fs::write(&path, json.to_string()).unwrap();

    let loaded = JsonFileAnnotationStore::new(&path).load().unwrap();
    let annotation = &loaded["src/old.rs"][0];
    assert_eq!(annotation.id, id);
    assert_eq!(annotation.content_snapshot, None);
    assert!(!annotation.matched);
}

#[test]
fn nil_id_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("annotations.json");
    let json = serde_json::json!({
        "src/a.rs": [{
            "id": Uuid::nil().to_string(),
            "filePath": "src/a.rs",
            "contentSnapshot": "fn a() {}"
        }]
    });
    std::fs::write(&path, json.to_string()).unwrap();

    let err = JsonFileAnnotationStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StoreError::Json(_)), "unexpected error: {err}");
    assert!(err.to_string().contains("nil"));
}

#[test]
fn misfiled_and_duplicate_records_are_rejected() {
    let mut misfiled = sample();
    let annotation = misfiled["src/main.rs"][0].clone();
    misfiled.insert("src/other.rs".to_string(), vec![annotation.clone()]);
    let mut store = MemoryAnnotationStore::new();
    let err = store.save(&misfiled).unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)));

    let mut duplicated = sample();
    duplicated
        .get_mut("src/main.rs")
        .unwrap()
        .push(annotation.clone());
    let err = store.save(&duplicated).unwrap_err();
    assert!(err.to_string().contains("duplicate"));
    assert_eq!(store.save_count(), 0);
}

#[test]
fn memory_store_round_trips_and_counts_saves() {
    let mut store = MemoryAnnotationStore::new();
    store.save(&sample()).unwrap();
    store.save(&sample()).unwrap();
    assert_eq!(store.save_count(), 2);
    assert_eq!(store.load().unwrap()["src/main.rs"].len(), 1);
}
