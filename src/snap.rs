//! Module implement versioned snapshots of the live state.
//!
//! A snapshot is a deep copy of the state at capture time, tagged
//! with an id that is unique for the lifetime of the process, never
//! reused even after the snapshot is dropped. The store keeps
//! snapshots newest-first, rolling back to a snapshot drops every
//! snapshot positioned before it, the newer ones.

use log::debug;

use std::slice;

use crate::{db::State, Error, Result};

/// Snapshot type, `(id, entries)` where entries is a state frozen at
/// capture time.
///
/// Handles inside the frozen state resolve within that state only,
/// no reference leaks into the live state or into other snapshots.
#[derive(Clone, Debug)]
pub struct Snapshot {
    id: u64,
    entries: State,
}

impl Snapshot {
    /// Return this snapshot's id.
    #[inline]
    pub fn to_id(&self) -> u64 {
        self.id
    }

    /// Return the frozen state.
    #[inline]
    pub fn as_entries(&self) -> &State {
        &self.entries
    }

    pub(crate) fn as_entries_mut(&mut self) -> &mut State {
        &mut self.entries
    }
}

/// SnapshotStore type, ordered newest-first collection of snapshots.
#[derive(Clone, Default, Debug)]
pub struct SnapshotStore {
    snaps: Vec<Snapshot>,
    next_id: u64,
}

impl SnapshotStore {
    pub fn new() -> SnapshotStore {
        SnapshotStore::default()
    }

    /// Return the number of snapshots held.
    #[inline]
    pub fn len(&self) -> usize {
        self.snaps.len()
    }

    /// Return whether the store holds no snapshots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snaps.is_empty()
    }

    /// Iterate snapshots newest first.
    #[inline]
    pub fn iter(&self) -> slice::Iter<Snapshot> {
        self.snaps.iter()
    }

    fn find(&self, id: u64) -> Result<usize> {
        match self.snaps.iter().position(|s| s.id == id) {
            Some(i) => Ok(i),
            None => err_at!(NoSuchSnapshot, msg: "{}", id),
        }
    }

    /// Freeze a deep copy of `state`, return the new snapshot's id.
    /// The snapshot is prepended, listings run newest first.
    pub fn capture(&mut self, state: &State) -> u64 {
        self.next_id += 1;
        let id = self.next_id;

        debug!(target: "snap", "capture snapshot {} of {} entries", id, state.len());

        let snap = Snapshot { id, entries: state.clone() };
        self.snaps.insert(0, snap);

        id
    }

    /// Return a fresh deep copy of snapshot `id`'s state, the caller
    /// installs it as the live state. Snapshots are untouched.
    pub fn checkout(&self, id: u64) -> Result<State> {
        let i = self.find(id)?;
        debug!(target: "snap", "checkout snapshot {}", id);
        Ok(self.snaps[i].entries.clone())
    }

    /// Checkout, and additionally drop every snapshot newer than
    /// `id`, that is, every snapshot positioned before it.
    pub fn rollback(&mut self, id: u64) -> Result<State> {
        let i = self.find(id)?;
        debug!(target: "snap", "rollback to snapshot {}, dropping {} newer", id, i);

        let state = self.snaps[i].entries.clone();
        self.snaps.drain(..i);

        Ok(state)
    }

    /// Remove snapshot `id` from the store.
    pub fn drop_snapshot(&mut self, id: u64) -> Result<()> {
        let i = self.find(id)?;
        debug!(target: "snap", "drop snapshot {}", id);
        self.snaps.remove(i);
        Ok(())
    }

    /// Return whether `key` can be purged from every snapshot, true
    /// when no snapshot holds an entry referring to it.
    pub fn can_purge(&self, key: &str) -> bool {
        self.snaps.iter().all(|s| s.entries.can_purge(key))
    }

    /// Remove `key` from every snapshot, a no-op in snapshots that
    /// lack it. Caller has already verified purgeability across the
    /// store, refer to [SnapshotStore::can_purge].
    pub(crate) fn purge(&mut self, key: &str) {
        for snap in self.snaps.iter_mut() {
            snap.as_entries_mut().purge(key);
        }
    }
}

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;
