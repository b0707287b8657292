//! TaskStore contract tests — no running server, pure store + file adapter.

use taskd::store::persist::TaskFile;
use taskd::store::{StoreError, TaskPatch, TaskStore};

// ─── 1. ID assignment ────────────────────────────────────────────────────────

/// N creates yield IDs exactly 1..=N in call order.
#[test]
fn test_sequential_ids() {
    let mut store = TaskStore::new();
    for i in 1..=10u64 {
        let task = store.create(&format!("task {i}"), None).expect("create failed");
        assert_eq!(task.id, i);
    }
    let ids: Vec<u64> = store.list(None).iter().map(|t| t.id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<u64>>());
}

/// Deleting never frees an ID for reuse.
#[test]
fn test_ids_are_never_reused() {
    let mut store = TaskStore::new();
    store.create("first", None).unwrap();
    store.create("second", None).unwrap();
    store.delete(2).unwrap();

    let replacement = store.create("third", None).unwrap();
    assert_eq!(replacement.id, 3, "ID 2 must stay retired after delete");
}

// ─── 2. Delete semantics ─────────────────────────────────────────────────────

/// delete → get yields NotFound; a second delete yields NotFound too.
#[test]
fn test_delete_then_get_not_found() {
    let mut store = TaskStore::new();
    store.create("ephemeral", None).unwrap();

    store.delete(1).expect("first delete should succeed");
    assert!(matches!(store.get(1), Err(StoreError::NotFound { id: 1 })));
    assert!(matches!(store.delete(1), Err(StoreError::NotFound { id: 1 })));
}

// ─── 3. Toggle ───────────────────────────────────────────────────────────────

/// One toggle flips `done`; a second restores the original value.
#[test]
fn test_toggle_twice_restores_state() {
    let mut store = TaskStore::new();
    store.create("flip me", None).unwrap();

    assert!(store.toggle(1).unwrap().done);
    assert!(!store.toggle(1).unwrap().done);
}

#[test]
fn test_toggle_missing_id_propagates_not_found() {
    let mut store = TaskStore::new();
    assert!(matches!(store.toggle(99), Err(StoreError::NotFound { id: 99 })));
}

// ─── 4. Filtering and stats ──────────────────────────────────────────────────

/// list(done=true) and list(done=false) partition list() with no overlap.
#[test]
fn test_done_pending_partition() {
    let mut store = TaskStore::new();
    for i in 0..6 {
        store.create(&format!("t{i}"), None).unwrap();
    }
    store.toggle(2).unwrap();
    store.toggle(5).unwrap();

    let all = store.list(None);
    let done = store.list(Some(true));
    let pending = store.list(Some(false));

    assert_eq!(done.len() + pending.len(), all.len());
    for task in &done {
        assert!(task.done);
        assert!(!pending.iter().any(|p| p.id == task.id));
    }
    for task in &pending {
        assert!(!task.done);
    }
}

#[test]
fn test_stats_track_list() {
    let mut store = TaskStore::new();
    assert_eq!(store.stats().total, 0);
    assert_eq!(store.stats().completion_percentage, 0.0);

    for i in 0..4 {
        store.create(&format!("t{i}"), None).unwrap();
    }
    store.toggle(1).unwrap();

    let stats = store.stats();
    assert_eq!(stats.total, store.list(None).len());
    assert_eq!(stats.done, 1);
    assert_eq!(stats.pending, 3);
    assert_eq!(stats.completion_percentage, 25.0);
}

// ─── 5. Update ───────────────────────────────────────────────────────────────

/// Unset patch fields leave the record untouched.
#[test]
fn test_partial_update() {
    let mut store = TaskStore::new();
    store
        .create("original", Some("keep me".to_string()))
        .unwrap();

    let task = store
        .update(
            1,
            TaskPatch {
                title: Some("renamed".to_string()),
                description: None,
                done: None,
            },
        )
        .unwrap();
    assert_eq!(task.title, "renamed");
    assert_eq!(task.description.as_deref(), Some("keep me"));
    assert!(!task.done);

    let task = store
        .update(
            1,
            TaskPatch {
                title: None,
                description: None,
                done: Some(true),
            },
        )
        .unwrap();
    assert_eq!(task.title, "renamed");
    assert!(task.done);
}

#[test]
fn test_update_missing_id_propagates_not_found() {
    let mut store = TaskStore::new();
    let err = store.update(7, TaskPatch::default());
    assert!(matches!(err, Err(StoreError::NotFound { id: 7 })));
}

// ─── 6. Scenario walks ───────────────────────────────────────────────────────

/// The full create → toggle → create → delete walk from the store contract.
#[test]
fn test_scenario_walk() {
    let mut store = TaskStore::new();

    let milk = store.create("Buy milk", None).unwrap();
    assert_eq!(milk.id, 1);
    assert!(!milk.done);

    assert!(store.toggle(1).unwrap().done);

    let read = store.create("Read", None).unwrap();
    assert_eq!(read.id, 2);

    store.delete(1).unwrap();
    assert!(matches!(store.get(1), Err(StoreError::NotFound { id: 1 })));

    let remaining = store.list(None);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, 2);

    let stats = store.stats();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.done, 0);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.completion_percentage, 0.0);
}

// ─── 7. Persistence round-trip ───────────────────────────────────────────────

/// save(list()) → load() yields an equal collection, and the rebuilt store
/// continues the ID sequence past the highest persisted ID.
#[tokio::test]
async fn test_save_load_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let file = TaskFile::new(dir.path());

    let mut store = TaskStore::new();
    store.create("Buy milk", None).unwrap();
    store
        .create("Read", Some("chapter 4".to_string()))
        .unwrap();
    store.toggle(1).unwrap();

    file.save(store.tasks()).await.expect("save failed");

    let reloaded = TaskStore::from_records(file.load().await);
    assert_eq!(reloaded.tasks(), store.tasks());

    let next = reloaded.list(None).iter().map(|t| t.id).max().unwrap() + 1;
    let mut reloaded = reloaded;
    assert_eq!(reloaded.create("new after reload", None).unwrap().id, next);
}

/// next_id comes from the highest persisted ID, not the record count.
#[tokio::test]
async fn test_next_id_recomputed_from_max() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let file = TaskFile::new(dir.path());

    let mut store = TaskStore::new();
    for i in 0..7 {
        store.create(&format!("t{i}"), None).unwrap();
    }
    for id in [1, 2, 4, 6] {
        store.delete(id).unwrap();
    }
    file.save(store.tasks()).await.unwrap();

    // Survivors are 3, 5, 7 — the next create must get 8.
    let mut reloaded = TaskStore::from_records(file.load().await);
    assert_eq!(reloaded.create("t next", None).unwrap().id, 8);
}
