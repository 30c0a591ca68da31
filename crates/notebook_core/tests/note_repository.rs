use notebook_core::{
    Importance, KeyValueStore, KvNoteRepository, MemoryKeyValueStore, NoteRepository, RepoError,
    StorageError, NOTES_KEY,
};

mod common;
use common::{note, FlakyStore};

fn seeded_repo() -> KvNoteRepository<MemoryKeyValueStore> {
    let repo = KvNoteRepository::new(MemoryKeyValueStore::new());
    for (id, title) in [(10, "first"), (20, "second"), (30, "third")] {
        repo.save(&note(id, title, "body", Importance::Low), false)
            .unwrap();
    }
    repo
}

#[test]
fn load_all_on_unset_storage_is_empty() {
    let repo = KvNoteRepository::new(MemoryKeyValueStore::new());
    assert!(repo.load_all().is_empty());
}

#[test]
fn create_appends_after_existing_entries() {
    let repo = seeded_repo();
    let added = note(40, "fourth", "body", Importance::High);

    repo.save(&added, false).unwrap();

    let notes = repo.load_all();
    let ids: Vec<_> = notes.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![10, 20, 30, 40]);
    assert_eq!(notes.iter().filter(|n| **n == added).count(), 1);
}

#[test]
fn update_replaces_in_place_and_keeps_length() {
    let repo = seeded_repo();
    let mut changed = note(20, "second", "rewritten", Importance::Medium);
    changed.title = "second, edited".to_string();

    repo.save(&changed, true).unwrap();

    let notes = repo.load_all();
    assert_eq!(notes.len(), 3);
    assert_eq!(notes[1], changed);
    assert_eq!(notes[0].title, "first");
    assert_eq!(notes[2].title, "third");
}

#[test]
fn update_of_unknown_id_fails_without_writing() {
    let store = FlakyStore::new();
    let repo = KvNoteRepository::new(&store);
    repo.save(&note(1, "a", "b", Importance::Low), false)
        .unwrap();
    let writes_before = store.writes.get();

    let err = repo
        .save(&note(2, "ghost", "b", Importance::Low), true)
        .unwrap_err();

    assert!(matches!(err, RepoError::NotFound(2)));
    assert_eq!(store.writes.get(), writes_before);
    assert_eq!(repo.load_all().len(), 1);
}

#[test]
fn create_with_existing_id_is_rejected() {
    let repo = seeded_repo();
    let err = repo
        .save(&note(10, "dup", "b", Importance::Low), false)
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateId(10)));
    assert_eq!(repo.load_all().len(), 3);
}

#[test]
fn delete_removes_exactly_the_matching_entry() {
    let repo = seeded_repo();

    assert!(repo.delete_by_id(20).unwrap());

    let ids: Vec<_> = repo.load_all().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![10, 30]);
}

#[test]
fn delete_is_idempotent_and_ignores_unknown_ids() {
    let repo = seeded_repo();

    assert!(repo.delete_by_id(30).unwrap());
    let after_once = repo.load_all();
    assert!(!repo.delete_by_id(30).unwrap());
    assert_eq!(repo.load_all(), after_once);

    assert!(!repo.delete_by_id(999).unwrap());
    assert_eq!(repo.load_all().len(), 2);
}

#[test]
fn malformed_storage_loads_empty_but_is_never_overwritten() {
    let raw = r#"[{"id":1,"title":"keep me","content":"body","date":"2024-01-05T00:00:00.000Z","importance":"low"},{"id":2,"title":"bad","content":"body","date":"2024-01-05T00:00:00.000Z","importance":"High"}]"#;
    let store = FlakyStore::new();
    store.set_item(NOTES_KEY, raw).unwrap();
    let writes_before = store.writes.get();
    let repo = KvNoteRepository::new(&store);

    assert!(repo.load_all().is_empty());

    let err = repo
        .save(&note(3, "new", "note", Importance::Low), false)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Persistence(StorageError::Decode(_))
    ));
    assert!(matches!(
        repo.delete_by_id(1).unwrap_err(),
        RepoError::Persistence(StorageError::Decode(_))
    ));
    assert!(repo.next_note_id().is_err());

    assert_eq!(store.writes.get(), writes_before);
    assert_eq!(store.raw(NOTES_KEY).as_deref(), Some(raw));
}

#[test]
fn truncated_json_blocks_mutations_too() {
    let store = MemoryKeyValueStore::new().with_item(NOTES_KEY, "{\"oops\": ");
    let repo = KvNoteRepository::new(store);

    assert!(repo.load_all().is_empty());
    assert!(repo
        .save(&note(5, "fresh", "start", Importance::Low), false)
        .is_err());
    assert_eq!(
        repo.store().get_item(NOTES_KEY).unwrap().as_deref(),
        Some("{\"oops\": ")
    );
}

#[test]
fn read_failure_loads_empty_but_blocks_mutations() {
    let store = FlakyStore::new();
    let repo = KvNoteRepository::new(&store);
    repo.save(&note(1, "kept", "safe", Importance::Low), false)
        .unwrap();

    store.fail_reads.set(true);
    assert!(repo.load_all().is_empty());
    let err = repo
        .save(&note(2, "new", "note", Importance::Low), false)
        .unwrap_err();
    assert!(matches!(err, RepoError::Persistence(_)));
    assert!(matches!(
        repo.delete_by_id(1).unwrap_err(),
        RepoError::Persistence(_)
    ));

    store.fail_reads.set(false);
    let ids: Vec<_> = repo.load_all().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn write_failure_surfaces_persistence_error() {
    let store = FlakyStore::new();
    let repo = KvNoteRepository::new(&store);
    store.fail_writes.set(true);

    let err = repo
        .save(&note(1, "a", "b", Importance::Low), false)
        .unwrap_err();
    assert!(matches!(err, RepoError::Persistence(_)));
    assert!(err.to_string().contains("quota exceeded"));
    assert_eq!(store.raw(NOTES_KEY), None);
}

#[test]
fn next_note_id_is_greater_than_every_stored_id() {
    let repo = KvNoteRepository::new(MemoryKeyValueStore::new());
    let far_future = i64::MAX / 2;
    repo.save(&note(far_future, "a", "b", Importance::Low), false)
        .unwrap();

    let next = repo.next_note_id().unwrap();
    assert_eq!(next, far_future + 1);

    repo.save(&note(next, "c", "d", Importance::Low), false)
        .unwrap();
    assert!(repo.next_note_id().unwrap() > next);
}

#[test]
fn find_by_id_reads_a_fresh_collection() {
    let repo = seeded_repo();
    assert_eq!(repo.find_by_id(20).map(|n| n.title), Some("second".to_string()));

    repo.delete_by_id(20).unwrap();
    assert!(repo.find_by_id(20).is_none());
}
