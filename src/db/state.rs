//! Module implement the live state, an insertion-ordered arena of
//! entries, and the closure bookkeeping over entry references.
//!
//! `forward`/`backward` closures are maintained eagerly on every link
//! and unlink, so aggregate queries and deletion gating run without
//! walking the reference graph. The closures are multisets, refer to
//! [State::link] and [State::unlink] for the exact contract.

use log::trace;

use std::cmp;

use crate::{
    db::{Element, Entry, Id},
    Error, Result,
};

/// State type, the live insertion-ordered collection of entries.
///
/// Entries are kept by handle. `Element::Ref` and the closure
/// sequences store [Id] values that resolve within this state only.
/// Cloning a state clones the arena wholesale, handles inside the
/// clone resolve to the clone's own entries, which makes `clone()` a
/// deep, isolated copy, the property the snapshot store is built on.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct State {
    entries: Vec<Entry>,
    next_id: u64,
}

impl State {
    pub fn new() -> State {
        State::default()
    }

    /// Return the number of entries in this state.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether this state holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<Entry> {
        self.entries.iter()
    }

    /// Return the position of `key`, a linear scan in insertion
    /// order. Entries are few, and the scan keeps insertion order
    /// a plain property of the arena.
    pub fn find_key(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.has_key(key))
    }

    /// Return the entry going by `key`.
    pub fn get(&self, key: &str) -> Result<&Entry> {
        match self.entries.iter().find(|e| e.has_key(key)) {
            Some(entry) => Ok(entry),
            None => err_at!(NoSuchKey, msg: "{}", key),
        }
    }

    pub(crate) fn entry(&self, id: Id) -> &Entry {
        match self.entries.iter().find(|e| e.id == id) {
            Some(entry) => entry,
            None => unreachable!("dangling handle {:?}", id),
        }
    }

    pub(crate) fn entry_mut(&mut self, id: Id) -> &mut Entry {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry,
            None => unreachable!("dangling handle {:?}", id),
        }
    }

    /// Create an empty entry for `key` at the end of the insertion
    /// order, return its handle. Caller makes sure `key` is absent.
    pub(crate) fn insert_new(&mut self, key: &str) -> Id {
        self.next_id += 1;
        let id = Id(self.next_id);
        self.entries.push(Entry::new(id, key));
        id
    }

    /// Remove an entry from the arena. Caller makes sure the entry's
    /// closures are already empty of contributions, refer to
    /// [State::deref_all].
    pub(crate) fn remove(&mut self, id: Id) {
        if let Some(i) = self.entries.iter().position(|e| e.id == id) {
            self.entries.remove(i);
        }
    }

    pub(crate) fn clear_elements(&mut self, id: Id) {
        self.entry_mut(id).elements.clear();
    }

    pub(crate) fn extend_elements(&mut self, id: Id, elements: &[Element]) {
        self.entry_mut(id).elements.extend_from_slice(elements);
    }

    pub(crate) fn splice_front(&mut self, id: Id, elements: &[Element]) {
        let entry = self.entry_mut(id);
        entry.elements.splice(0..0, elements.iter().copied());
    }

    pub(crate) fn remove_element_at(&mut self, id: Id, index: usize) -> Element {
        self.entry_mut(id).elements.remove(index)
    }
}

impl State {
    /// Return whether inserting a reference element `u -> v` would
    /// close a cycle. True when `v` is `u` itself, or when `u` is
    /// already reachable from `v`. Because `forward` holds the full
    /// transitive closure, the membership test is sufficient.
    pub fn creates_cycle(&self, u: Id, v: Id) -> bool {
        u == v || self.entry(v).forward.contains(&u)
    }

    /// Record a new reference element `u -> v` in the closures.
    ///
    /// Every entry that could already reach `u` now additionally
    /// reaches `v` and everything `v` reaches, and symmetrically on
    /// the backward side. Appends preserve duplicates on purpose, one
    /// occurrence per contributing path, so that [State::unlink] can
    /// undo exactly one contribution.
    ///
    /// Caller is responsible for the acyclicity gate, refer to
    /// [State::creates_cycle].
    pub(crate) fn link(&mut self, u: Id, v: Id) {
        trace!(target: "state", "link {:?} -> {:?}", u, v);

        let v_fwd = self.entry(v).forward.clone();
        let u_bwd = self.entry(u).backward.clone();

        {
            let entry = self.entry_mut(u);
            entry.forward.push(v);
            entry.forward.extend_from_slice(&v_fwd);
        }
        for w in u_bwd.iter() {
            let entry = self.entry_mut(*w);
            entry.forward.push(v);
            entry.forward.extend_from_slice(&v_fwd);
        }
        {
            let entry = self.entry_mut(v);
            entry.backward.push(u);
            entry.backward.extend_from_slice(&u_bwd);
        }
        for x in v_fwd.iter() {
            let entry = self.entry_mut(*x);
            entry.backward.push(u);
            entry.backward.extend_from_slice(&u_bwd);
        }
    }

    /// Exact inverse of [State::link], called when a reference
    /// element `u -> v` is removed. Pops the first matching
    /// occurrence for each appended handle, never all occurrences,
    /// which restores the multiset counts when `v` appears more than
    /// once among `u`'s elements.
    pub(crate) fn unlink(&mut self, u: Id, v: Id) {
        trace!(target: "state", "unlink {:?} -> {:?}", u, v);

        let v_fwd = self.entry(v).forward.clone();
        let u_bwd = self.entry(u).backward.clone();

        {
            let entry = self.entry_mut(u);
            pop_first(&mut entry.forward, v);
            for x in v_fwd.iter() {
                pop_first(&mut entry.forward, *x);
            }
        }
        for w in u_bwd.iter() {
            let entry = self.entry_mut(*w);
            pop_first(&mut entry.forward, v);
            for x in v_fwd.iter() {
                pop_first(&mut entry.forward, *x);
            }
        }
        {
            let entry = self.entry_mut(v);
            pop_first(&mut entry.backward, u);
            for w in u_bwd.iter() {
                pop_first(&mut entry.backward, *w);
            }
        }
        for x in v_fwd.iter() {
            let entry = self.entry_mut(*x);
            pop_first(&mut entry.backward, u);
            for w in u_bwd.iter() {
                pop_first(&mut entry.backward, *w);
            }
        }
    }

    /// Link every reference element of `elements` from `u`, in order.
    pub(crate) fn ref_all(&mut self, u: Id, elements: &[Element]) {
        for element in elements.iter() {
            if let Element::Ref(v) = element {
                self.link(u, *v);
            }
        }
    }

    /// Unlink `u` from every entry in its forward closure. Unlinking
    /// mutates the closure being drained, so the loop keeps taking
    /// the first remaining occurrence until none is left.
    pub(crate) fn deref_all(&mut self, u: Id) {
        while let Some(v) = self.entry(u).forward.first().copied() {
            self.unlink(u, v);
        }
    }
}

impl State {
    /// Return whether `key` can be purged from this state, true when
    /// the key is absent, or present with nothing referring to it.
    pub fn can_purge(&self, key: &str) -> bool {
        match self.entries.iter().find(|e| e.has_key(key)) {
            Some(entry) => entry.backward.is_empty(),
            None => true,
        }
    }

    /// Remove `key` from this state, a no-op when absent. Caller has
    /// already verified purgeability, refer to [State::can_purge].
    pub(crate) fn purge(&mut self, key: &str) {
        if let Some(i) = self.find_key(key) {
            let id = self.entries[i].id;
            self.deref_all(id);
            self.remove(id);
        }
    }
}

impl State {
    /// Minimum integer reachable from `id`'s elements, recursing
    /// through references. An entry without leaf integers reports
    /// `i32::MAX`.
    pub fn min(&self, id: Id) -> i32 {
        let mut min = i32::MAX;
        for element in self.entry(id).elements.iter() {
            let val = match element {
                Element::Int(num) => *num,
                Element::Ref(v) => self.min(*v),
            };
            min = cmp::min(min, val);
        }
        min
    }

    /// Maximum integer reachable from `id`'s elements, recursing
    /// through references. An entry without leaf integers reports
    /// `i32::MIN`.
    pub fn max(&self, id: Id) -> i32 {
        let mut max = i32::MIN;
        for element in self.entry(id).elements.iter() {
            let val = match element {
                Element::Int(num) => *num,
                Element::Ref(v) => self.max(*v),
            };
            max = cmp::max(max, val);
        }
        max
    }

    /// Sum of integers reachable from `id`'s elements, recursing
    /// through references, accumulated in 64-bit.
    pub fn sum(&self, id: Id) -> i64 {
        let mut sum: i64 = 0;
        for element in self.entry(id).elements.iter() {
            sum += match element {
                Element::Int(num) => *num as i64,
                Element::Ref(v) => self.sum(*v),
            };
        }
        sum
    }

    /// Count of leaf integers reachable from `id`'s elements,
    /// recursing through references.
    pub fn count(&self, id: Id) -> usize {
        let mut count = 0;
        for element in self.entry(id).elements.iter() {
            count += match element {
                Element::Int(_) => 1,
                Element::Ref(v) => self.count(*v),
            };
        }
        count
    }

    /// Render a closure sequence as keys, sorted ascending with
    /// adjacent duplicates removed.
    pub fn closure_keys(&self, ids: &[Id]) -> Vec<String> {
        let mut keys: Vec<String> =
            ids.iter().map(|id| self.entry(*id).key.clone()).collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

impl State {
    /// Validate this state against its invariants:
    ///
    /// * keys are unique,
    /// * no entry appears in its own forward closure,
    /// * for every ordered pair `(u, x)`, the multiset count of `x`
    ///   in `u.forward` equals the count of `u` in `x.backward`, and
    ///   both equal the number of distinct reference paths from `u`
    ///   to `x` through element occurrences.
    pub fn validate(&self) -> Result<()> {
        for (i, e) in self.entries.iter().enumerate() {
            for f in self.entries[(i + 1)..].iter() {
                if e.key == f.key {
                    err_at!(Fatal, msg: "duplicate key {}", e.key)?
                }
            }
        }

        for e in self.entries.iter() {
            if e.forward.contains(&e.id) {
                err_at!(Fatal, msg: "entry {} reaches itself", e.key)?
            }
        }

        for u in self.entries.iter() {
            for x in self.entries.iter() {
                let n_paths = self.count_paths(u.id, x.id);
                let n_fwd = u.forward.iter().filter(|id| **id == x.id).count();
                let n_bwd = x.backward.iter().filter(|id| **id == u.id).count();
                if n_paths != n_fwd || n_paths != n_bwd {
                    err_at!(
                        Fatal,
                        msg: "closure {}->{} paths:{} fwd:{} bwd:{}",
                        u.key, x.key, n_paths, n_fwd, n_bwd
                    )?
                }
            }
        }

        Ok(())
    }

    // number of distinct reference paths from `u` to `x`, counting
    // element occurrences, the quantity the closures materialize.
    fn count_paths(&self, u: Id, x: Id) -> usize {
        let mut n = 0;
        for element in self.entry(u).elements.iter() {
            if let Element::Ref(v) = element {
                if *v == x {
                    n += 1;
                }
                n += self.count_paths(*v, x);
            }
        }
        n
    }
}

fn pop_first(seq: &mut Vec<Id>, id: Id) {
    if let Some(i) = seq.iter().position(|x| *x == id) {
        seq.remove(i);
    }
}

#[cfg(any(test, feature = "debug"))]
pub fn load_state(seed: u64, n_entries: usize, n_ops: usize) -> State {
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    let mut rng = SmallRng::seed_from_u64(seed);

    let mut state = State::new();
    let ids: Vec<Id> = (0..n_entries)
        .map(|i| state.insert_new(&format!("key{}", i)))
        .collect();

    for _ in 0..n_ops {
        let u = ids[rng.gen::<usize>() % ids.len()];
        let element = match rng.gen::<u8>() % 3 {
            0 => Element::of_int(rng.gen::<i32>() % 1000),
            _ => {
                let v = ids[rng.gen::<usize>() % ids.len()];
                if state.creates_cycle(u, v) {
                    continue;
                }
                Element::of_ref(v)
            }
        };
        state.extend_elements(u, &[element]);
        state.ref_all(u, &[element]);
    }

    state
}

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;
