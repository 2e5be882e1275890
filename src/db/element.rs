use std::cmp;

use crate::db::Id;

/// Element type, a single value within an entry. There can be two
/// kinds of elements, an integer element holding a 32-bit signed
/// number, and a reference element pointing to another entry in the
/// same state.
///
/// Reference elements hold an [Id] handle, never an owning pointer,
/// the handle resolves only within the state (or snapshot) that owns
/// the referred entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Element {
    Int(i32),
    Ref(Id),
}

impl Element {
    #[inline]
    pub fn of_int(num: i32) -> Element {
        Element::Int(num)
    }

    #[inline]
    pub fn of_ref(id: Id) -> Element {
        Element::Ref(id)
    }

    /// Return whether this element is a reference to another entry.
    #[inline]
    pub fn is_ref(&self) -> bool {
        matches!(self, Element::Ref(_))
    }

    /// Return the referred entry's handle, None for integer elements.
    #[inline]
    pub fn to_ref_id(&self) -> Option<Id> {
        match self {
            Element::Ref(id) => Some(*id),
            Element::Int(_) => None,
        }
    }

    /// Three-way comparison of two integer elements. Reference
    /// elements have no ordering, callers gate the sort/uniq path on
    /// simple entries, where every element is an integer.
    pub fn cmp_int(&self, other: &Element) -> cmp::Ordering {
        match (self, other) {
            (Element::Int(a), Element::Int(b)) => a.cmp(b),
            (_, _) => cmp::Ordering::Equal,
        }
    }
}

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;
