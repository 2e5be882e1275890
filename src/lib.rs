//! Package implement an interactive, single-user, in-memory database
//! of named integer entries, with nested references between entries
//! and full versioned snapshots.
//!
//! [State] holds the live, insertion-ordered collection of entries.
//! An [Entry] is a named record holding an ordered sequence of
//! elements, where each [Element] is either a 32-bit integer or a
//! reference to another entry within the same state. Every entry
//! eagerly maintains the transitive closure of entries it can reach
//! (forward) and of entries that can reach it (backward), so that
//! aggregate queries and deletion gating never have to traverse the
//! reference graph.
//!
//! [SnapshotStore] freezes deep copies of the live state, each tagged
//! with an id that increases monotonically for the lifetime of the
//! process. A snapshot can be checked out, replacing the live state,
//! rolled back to, which additionally drops every newer snapshot, or
//! dropped.
//!
//! [Db] stitches state and snapshots together as typed command
//! operations, and [Repl] drives a [Db] over a line-oriented prompt.
//!
//! The reference graph is kept acyclic by construction, an entry can
//! never reach itself, directly or transitively. Refer to [State] for
//! the bookkeeping details.

use std::{error, fmt, result};

/// Short form to compose Error values.
///
/// Here are few possible ways:
///
/// ```ignore
/// use crate::Error;
/// err_at!(NoSuchKey, msg: "key {}", key)
/// ```
///
/// ```ignore
/// use crate::Error;
/// err_at!(IOError, fd.flush())
/// ```
///
/// ```ignore
/// use crate::Error;
/// err_at!(IOError, fd.flush(), "flushing reply stream")
/// ```
///
#[macro_export]
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("at {}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("at {}:{}", file!(), line!());
                Err(Error::$v(prefix, format!("{}", err)))
            }
        }
    }};
    ($v:ident, $e:expr, $($arg:expr),+) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("at {}:{}", file!(), line!());
                let msg = format!($($arg),+);
                Err(Error::$v(prefix, format!("{} {}", err, msg)))
            }
        }
    }};
}

pub mod cmd;
pub mod db;
pub mod repl;
pub mod snap;

pub use crate::cmd::{Command, Db, Reply, Repr};
pub use crate::db::{Element, Entry, Id, State, KEY_LIMIT};
pub use crate::repl::Repl;
pub use crate::snap::{Snapshot, SnapshotStore};

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;

/// Error variants that can be returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the error
/// location, and a message. All variants other than [Error::Fatal]
/// and [Error::IOError] map one-to-one onto the reply strings of the
/// command prompt, refer to [Error::to_reply].
#[derive(Clone)]
pub enum Error {
    NoSuchKey(String, String),
    NoSuchSnapshot(String, String),
    NotPermitted(String, String),
    IndexOutOfRange(String, String),
    InvalidInteger(String, String),
    MissingKey(String, String),
    NotSimple(String, String),
    InvalidListArg(String, String),
    NoSuchCommand(String, String),
    OutOfMemory(String, String),
    Fatal(String, String),
    IOError(String, String),
}

impl Error {
    /// Render this error as its command-prompt reply string.
    pub fn to_reply(&self) -> String {
        use Error::*;

        let reply = match self {
            NoSuchKey(_, _) => "no such key",
            NoSuchSnapshot(_, _) => "no such snapshot",
            NotPermitted(_, _) => "not permitted",
            IndexOutOfRange(_, _) => "index out of range",
            InvalidInteger(_, _) => "invalid integer",
            MissingKey(_, _) => "missing key",
            NotSimple(_, _) => "entry is not simple",
            InvalidListArg(_, _) => "invalid list command",
            NoSuchCommand(_, _) => "no such command",
            OutOfMemory(_, _) => "out of memory",
            Fatal(p, msg) => return format!("fatal {} {}", p, msg),
            IOError(p, msg) => return format!("io-error {} {}", p, msg),
        };

        reply.to_string()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            NoSuchKey(p, msg) => write!(f, "{} NoSuchKey: {}", p, msg),
            NoSuchSnapshot(p, msg) => write!(f, "{} NoSuchSnapshot: {}", p, msg),
            NotPermitted(p, msg) => write!(f, "{} NotPermitted: {}", p, msg),
            IndexOutOfRange(p, msg) => write!(f, "{} IndexOutOfRange: {}", p, msg),
            InvalidInteger(p, msg) => write!(f, "{} InvalidInteger: {}", p, msg),
            MissingKey(p, msg) => write!(f, "{} MissingKey: {}", p, msg),
            NotSimple(p, msg) => write!(f, "{} NotSimple: {}", p, msg),
            InvalidListArg(p, msg) => write!(f, "{} InvalidListArg: {}", p, msg),
            NoSuchCommand(p, msg) => write!(f, "{} NoSuchCommand: {}", p, msg),
            OutOfMemory(p, msg) => write!(f, "{} OutOfMemory: {}", p, msg),
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
            IOError(p, msg) => write!(f, "{} IOError: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}
