use std::{fmt, result};

use crate::db::{Element, KEY_LIMIT};

/// Handle to an entry, stable within a state and all its clones.
///
/// Handles are assigned from a per-state counter and never reused
/// within the lifetime of that state or the snapshots cloned from it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(pub(crate) u64);

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "id<{}>", self.0)
    }
}

/// Entry type, a named record holding an ordered sequence of elements
/// and the two eagerly maintained closure sequences.
///
/// `forward` lists every entry reachable from this entry's elements
/// through reference elements, transitively. `backward` lists every
/// entry that can reach this entry. Both are multisets, an entry
/// appears once for each distinct reference path contributing it,
/// which is what lets the unlink path undo a single contribution by
/// popping one matching occurrence.
#[derive(Clone, PartialEq, Debug)]
pub struct Entry {
    pub(crate) id: Id,
    pub(crate) key: String,
    pub(crate) elements: Vec<Element>,
    pub(crate) forward: Vec<Id>,
    pub(crate) backward: Vec<Id>,
}

impl Entry {
    pub(crate) fn new(id: Id, key: &str) -> Entry {
        let key: String = key.chars().take(KEY_LIMIT).collect();
        Entry {
            id,
            key,
            elements: Vec::default(),
            forward: Vec::default(),
            backward: Vec::default(),
        }
    }

    /// Return this entry's handle.
    #[inline]
    pub fn to_id(&self) -> Id {
        self.id
    }

    /// Return a reference to this entry's key.
    #[inline]
    pub fn as_key(&self) -> &str {
        &self.key
    }

    /// Return whether this entry goes by `key`.
    #[inline]
    pub fn has_key(&self, key: &str) -> bool {
        self.key == key
    }

    /// An entry is simple when it holds no reference elements, that
    /// is, when its forward closure is empty. Only simple entries can
    /// be sorted, reversed or de-duplicated.
    #[inline]
    pub fn is_simple(&self) -> bool {
        self.forward.is_empty()
    }

    /// Return the ordered elements of this entry.
    #[inline]
    pub fn as_elements(&self) -> &[Element] {
        &self.elements
    }

    /// Return the number of elements held directly by this entry,
    /// references counting as one.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Return whether this entry holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Return the forward closure, entries reachable from this entry.
    #[inline]
    pub fn as_forward(&self) -> &[Id] {
        &self.forward
    }

    /// Return the backward closure, entries that can reach this entry.
    #[inline]
    pub fn as_backward(&self) -> &[Id] {
        &self.backward
    }
}

#[cfg(test)]
#[path = "entry_test.rs"]
mod entry_test;
