//! Module implement the data model, entries, elements and the live
//! state of the database.
//!
//! Refer to [State] for the reference-closure bookkeeping that makes
//! the whole arrangement tick.

mod element;
mod entry;
mod state;

pub use element::Element;
pub use entry::{Entry, Id};
pub use state::State;

#[cfg(any(test, feature = "debug"))]
pub use state::load_state;

/// Maximum number of characters allowed in an entry's key. Longer
/// keys are clipped at this limit when the entry is created.
pub const KEY_LIMIT: usize = 15;
