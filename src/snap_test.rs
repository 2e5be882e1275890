use rand::prelude::random;

use super::*;

use crate::db::{load_state, Element, State};

#[test]
fn test_capture_ids() {
    let mut store = SnapshotStore::new();
    assert!(store.is_empty());

    let state = State::new();
    assert_eq!(store.capture(&state), 1);
    assert_eq!(store.capture(&state), 2);
    assert_eq!(store.capture(&state), 3);
    assert_eq!(store.len(), 3);

    // listed newest first
    let ids: Vec<u64> = store.iter().map(|s| s.to_id()).collect();
    assert_eq!(ids, vec![3, 2, 1]);

    store.drop_snapshot(2).unwrap();
    let ids: Vec<u64> = store.iter().map(|s| s.to_id()).collect();
    assert_eq!(ids, vec![3, 1]);
    assert!(store.drop_snapshot(2).is_err());

    // dropped ids are never reissued
    assert_eq!(store.capture(&state), 4);
}

#[test]
fn test_checkout() {
    let mut state = State::new();
    let a = state.insert_new("a");
    state.extend_elements(a, &[Element::of_int(1), Element::of_int(2)]);

    let mut store = SnapshotStore::new();
    let id = store.capture(&state);

    state.extend_elements(a, &[Element::of_int(3)]);

    let restored = store.checkout(id).unwrap();
    restored.validate().unwrap();
    assert_ne!(restored, state);
    assert_eq!(restored.get("a").unwrap().len(), 2);
    assert_eq!(store.len(), 1);

    assert!(store.checkout(99).is_err());
}

#[test]
fn test_rollback() {
    let mut state = State::new();
    let a = state.insert_new("a");
    let mut store = SnapshotStore::new();

    state.extend_elements(a, &[Element::of_int(1)]);
    store.capture(&state);
    state.extend_elements(a, &[Element::of_int(2)]);
    store.capture(&state);
    state.extend_elements(a, &[Element::of_int(3)]);
    store.capture(&state);

    // restoring 2 drops 3, the newer one, and keeps 1.
    let restored = store.rollback(2).unwrap();
    restored.validate().unwrap();
    assert_eq!(restored.get("a").unwrap().len(), 2);
    let ids: Vec<u64> = store.iter().map(|s| s.to_id()).collect();
    assert_eq!(ids, vec![2, 1]);

    assert!(store.rollback(3).is_err());
    assert!(store.drop_snapshot(3).is_err());
}

#[test]
fn test_snapshot_isolation() {
    let seed: u64 = random();
    println!("test_snapshot_isolation {}", seed);

    let mut state = load_state(seed, 6, 200);
    state.validate().unwrap();

    let mut store = SnapshotStore::new();
    let id = store.capture(&state);

    let frozen = store.checkout(id).unwrap();
    frozen.validate().unwrap();
    assert_eq!(frozen, state);

    // gut the live state, the snapshot must not notice.
    let ids: Vec<_> = state.iter().map(|e| e.to_id()).collect();
    for u in ids.into_iter() {
        state.deref_all(u);
        state.clear_elements(u);
    }
    state.validate().unwrap();

    assert_eq!(store.checkout(id).unwrap(), frozen);
}

#[test]
fn test_purge_across_store() {
    let mut state = State::new();
    let a = state.insert_new("a");
    let b = state.insert_new("b");
    state.extend_elements(a, &[Element::of_int(1)]);
    let elements = [Element::of_ref(a)];
    state.extend_elements(b, &elements);
    state.ref_all(b, &elements);

    let mut store = SnapshotStore::new();
    store.capture(&state);

    // delete b from the live state, the snapshot's b still pins a.
    state.deref_all(b);
    state.remove(b);
    assert!(state.can_purge("a"));
    assert!(!store.can_purge("a"));

    assert!(store.can_purge("b"));
    store.purge("b");
    assert!(store.can_purge("a"));
    store.purge("a");

    for snap in store.iter() {
        snap.as_entries().validate().unwrap();
        assert!(snap.as_entries().is_empty());
    }
}
