use std::fs;

use neon_snake_storage::{
    read_high_score, write_high_score, JsonFileStore, KeyValueStore, StorageError,
    HIGH_SCORE_KEY,
};

#[test]
fn missing_file_reads_as_empty_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("scores.json"));

    assert_eq!(store.get_item(HIGH_SCORE_KEY).expect("read"), None);
    assert_eq!(read_high_score(&store), 0);
}

#[test]
fn high_score_survives_reopening_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("scores.json");

    let mut store = JsonFileStore::new(&path);
    write_high_score(&mut store, 230).expect("write");

    let reopened = JsonFileStore::new(&path);
    assert_eq!(read_high_score(&reopened), 230);

    let text = fs::read_to_string(&path).expect("file written");
    assert!(text.contains("\"neon_snake_highscore\": \"230\""), "{text}");
}

#[test]
fn updates_preserve_unrelated_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    fs::write(&path, r#"{"volume": "0.5"}"#).expect("seed file");

    let mut store = JsonFileStore::new(&path);
    write_high_score(&mut store, 40).expect("write");

    assert_eq!(store.get_item("volume").expect("read"), Some("0.5".to_owned()));
    assert_eq!(read_high_score(&store), 40);
}

#[test]
fn numeric_values_are_read_as_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    fs::write(&path, r#"{"neon_snake_highscore": 90}"#).expect("seed file");

    let store = JsonFileStore::new(&path);
    assert_eq!(read_high_score(&store), 90);
}

#[test]
fn malformed_file_surfaces_json_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    fs::write(&path, "not json").expect("seed file");

    let mut store = JsonFileStore::new(&path);

    match store.get_item(HIGH_SCORE_KEY) {
        Err(StorageError::Json { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(write_high_score(&mut store, 10).is_err());
    assert_eq!(read_high_score(&store), 0);
}
