use std::path::Path;

use transferwatch_core::record::RawRecord;
use transferwatch_core::resolution::{LookupOutcome, Resolution, Sentinel};
use transferwatch_store::{DedupKey, StoreError, TransferStore};

fn record(name: &str, id: Option<&str>) -> transferwatch_core::record::TransferRecord {
    RawRecord {
        player: Some(name.to_string()),
        transfermarkt_id: id.map(String::from),
        team_left: Some("AC Milan".to_string()),
        team_joined: Some("Inter".to_string()),
        fee: Some("€12.00m".to_string()),
    }
    .promote("2026-08-07 09:00:00".to_string())
    .unwrap()
}

#[test]
fn absent_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = TransferStore::load(&dir.path().join("transfers.json"), DedupKey::Name).unwrap();
    assert!(store.is_empty());
}

#[test]
fn persist_and_reload_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transfers.json");

    let mut store = TransferStore::load(&path, DedupKey::Name).unwrap();
    assert!(store.append(record("Erling Haaland", Some("418560"))));
    assert!(store.append(record("Vivianne Miedema", Some("375108"))));
    store.persist().unwrap();

    let reloaded = TransferStore::load(&path, DedupKey::Name).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.records()[0].player, "Erling Haaland");
    assert!(reloaded.contains("Vivianne Miedema", None));
}

#[test]
fn malformed_file_is_a_hard_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transfers.json");
    std::fs::write(&path, "{ not json").unwrap();

    match TransferStore::load(&path, DedupKey::Name) {
        Err(StoreError::Parse { .. }) => {}
        other => panic!("expected Parse error, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn append_rejects_duplicate_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut store =
        TransferStore::load(&dir.path().join("transfers.json"), DedupKey::Name).unwrap();

    assert!(store.append(record("João Félix", Some("462250"))));
    assert!(!store.append(record("João Félix", Some("999999"))));
    assert_eq!(store.len(), 1);
}

#[test]
fn name_and_id_key_separates_namesakes() {
    let dir = tempfile::tempdir().unwrap();
    let mut store =
        TransferStore::load(&dir.path().join("transfers.json"), DedupKey::NameAndId).unwrap();

    assert!(store.append(record("Danilo", Some("145707"))));
    assert!(store.append(record("Danilo", Some("628583"))));
    assert!(!store.append(record("Danilo", Some("145707"))));
    assert_eq!(store.len(), 2);
}

#[test]
fn apply_patches_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let mut store =
        TransferStore::load(&dir.path().join("transfers.json"), DedupKey::Name).unwrap();
    store.append(record("Sam Kerr", Some("357709")));

    assert!(store.apply(0, Resolution::FmrefId(LookupOutcome::Found("85002".into()))));
    assert_eq!(store.records()[0].fmref_id, "85002");

    assert!(!store.apply(7, Resolution::FmrefId(LookupOutcome::Sentinel(Sentinel::NotFound))));
}

#[test]
fn crash_before_rename_leaves_committed_file_intact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transfers.json");

    let mut store = TransferStore::load(&path, DedupKey::Name).unwrap();
    store.append(record("Alexia Putellas", Some("316264")));
    store.persist().unwrap();

    // Simulate a process killed after writing the temp file but before the
    // rename: a stale temp with garbage next to the committed document.
    std::fs::write(path.with_extension("json.tmp"), "[ {\"Player\": trunc").unwrap();

    let reloaded = TransferStore::load(&path, DedupKey::Name).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.records()[0].player, "Alexia Putellas");
}

#[test]
fn persist_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deep").join("transfers.json");

    let mut store = TransferStore::load(&path, DedupKey::Name).unwrap();
    store.append(record("Pernille Harder", Some("229719")));
    store.persist().unwrap();

    assert!(Path::new(&path).exists());
}
