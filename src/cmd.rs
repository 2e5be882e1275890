//! Module implement the command façade, typed operations over the
//! live state and the snapshot store.
//!
//! A [Command] is one parsed line of user input. Applying a command
//! against a [Db] validates its arguments, performs the mutation and
//! returns a structured [Reply]. Mutating commands validate before
//! touching the state, a command that fails leaves the database
//! exactly as it was.

use lazy_static::lazy_static;
use log::debug;

use std::{fmt, result};

use crate::{
    db::{Element, Id, State, KEY_LIMIT},
    snap::SnapshotStore,
    Error, Result,
};

// token separators for one input line.
const WHITESPACE: &[char] = &[' ', '\t', '\r', '\n', '\x0B', '\x0C'];

lazy_static! {
    /// Help text printed by the HELP command, assembled from the
    /// command table below, one group per blank line.
    pub static ref HELP_TEXT: String = {
        let groups: &[&[(&str, &str)]] = &[
            &[
                ("BYE", "clear database and exit"),
                ("HELP", "display this help message"),
            ],
            &[
                ("LIST KEYS", "displays all keys in current state"),
                ("LIST ENTRIES", "displays all entries in current state"),
                ("LIST SNAPSHOTS", "displays all snapshots in the database"),
            ],
            &[
                ("GET <key>", "displays entry values"),
                ("DEL <key>", "deletes entry from current state"),
                ("PURGE <key>", "deletes entry from current state and snapshots"),
            ],
            &[
                ("SET <key> <value ...>", "sets entry values"),
                ("PUSH <key> <value ...>", "pushes values to the front"),
                ("APPEND <key> <value ...>", "appends values to the back"),
            ],
            &[
                ("PICK <key> <index>", "displays value at index"),
                ("PLUCK <key> <index>", "displays and removes value at index"),
                ("POP <key>", "displays and removes the front value"),
            ],
            &[
                ("DROP <id>", "deletes snapshot"),
                ("ROLLBACK <id>", "restores to snapshot and deletes newer snapshots"),
                ("CHECKOUT <id>", "replaces current state with a copy of snapshot"),
                ("SNAPSHOT", "saves the current state as a snapshot"),
            ],
            &[
                ("MIN <key>", "displays minimum value"),
                ("MAX <key>", "displays maximum value"),
                ("SUM <key>", "displays sum of values"),
                ("LEN <key>", "displays number of values"),
            ],
            &[
                ("REV <key>", "reverses order of values (simple entry only)"),
                ("UNIQ <key>", "removes repeated adjacent values (simple entry only)"),
                ("SORT <key>", "sorts values in ascending order (simple entry only)"),
            ],
            &[
                ("FORWARD <key>", "lists all the forward references of this key"),
                ("BACKWARD <key>", "lists all the backward references of this key"),
                ("TYPE <key>", "displays if the entry of this key is simple or general"),
            ],
        ];

        let width = groups
            .iter()
            .flat_map(|g| g.iter())
            .map(|(usage, _)| usage.len())
            .max()
            .unwrap_or(0);

        let mut text = String::new();
        for (i, group) in groups.iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            for (usage, about) in group.iter() {
                text.push_str(&format!("{:<w$}  {}\n", usage, about, w = width));
            }
        }
        text
    };
}

/// Command type, a single parsed line of user input.
///
/// Argument tokens that name elements stay raw in the command, they
/// are resolved against the live state when the command is applied.
#[derive(Clone, PartialEq, Debug)]
pub enum Command {
    Help,
    Bye,
    List(ListWhat),
    Get(String),
    Del(String),
    Purge(Option<String>),
    Set { key: String, values: Vec<String> },
    Push { key: String, values: Vec<String> },
    Append { key: String, values: Vec<String> },
    Pick { key: String, index: usize },
    Pluck { key: String, index: usize },
    Pop(String),
    Drop(u64),
    Rollback(u64),
    Checkout(u64),
    Snapshot,
    Min(String),
    Max(String),
    Sum(String),
    Len(String),
    Rev(String),
    Uniq(String),
    Sort(String),
    Forward(String),
    Backward(String),
    Type(String),
}

/// Argument to the LIST command.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ListWhat {
    Keys,
    Entries,
    Snapshots,
}

impl Command {
    /// Parse one input line into a command. Tokens are split on
    /// space, tab, CR, LF, VT and FF, the verb and the LIST argument
    /// are case-insensitive.
    pub fn parse(line: &str) -> Result<Command> {
        let mut tokens = line
            .split(|c: char| WHITESPACE.contains(&c))
            .filter(|t| !t.is_empty());

        let verb = tokens.next().unwrap_or("").to_ascii_uppercase();
        let cmd = match verb.as_str() {
            "HELP" => Command::Help,
            "BYE" => Command::Bye,
            "LIST" => {
                let what = tokens.next().map(|t| t.to_ascii_uppercase());
                match what.as_deref() {
                    Some("KEYS") => Command::List(ListWhat::Keys),
                    Some("ENTRIES") => Command::List(ListWhat::Entries),
                    Some("SNAPSHOTS") => Command::List(ListWhat::Snapshots),
                    Some(what) => err_at!(InvalidListArg, msg: "{}", what)?,
                    None => err_at!(InvalidListArg, msg: "missing argument")?,
                }
            }
            "GET" => Command::Get(key_arg(&mut tokens)?),
            "DEL" => Command::Del(key_arg(&mut tokens)?),
            "PURGE" => Command::Purge(tokens.next().map(to_key)),
            "SET" => {
                let key = match tokens.next() {
                    Some(token) => token,
                    None => err_at!(MissingKey, msg: "set needs a key")?,
                };
                if looks_like_int(key) {
                    err_at!(NotPermitted, msg: "{} cannot name an entry", key)?
                }
                let values = tokens.map(String::from).collect();
                Command::Set { key: to_key(key), values }
            }
            "PUSH" => {
                let key = key_arg(&mut tokens)?;
                let values = tokens.map(String::from).collect();
                Command::Push { key, values }
            }
            "APPEND" => {
                let key = key_arg(&mut tokens)?;
                let values = tokens.map(String::from).collect();
                Command::Append { key, values }
            }
            "PICK" => {
                let key = key_arg(&mut tokens)?;
                let index = index_arg(&mut tokens)?;
                Command::Pick { key, index }
            }
            "PLUCK" => {
                let key = key_arg(&mut tokens)?;
                let index = index_arg(&mut tokens)?;
                Command::Pluck { key, index }
            }
            "POP" => Command::Pop(key_arg(&mut tokens)?),
            "DROP" => Command::Drop(id_arg(&mut tokens)?),
            "ROLLBACK" => Command::Rollback(id_arg(&mut tokens)?),
            "CHECKOUT" => Command::Checkout(id_arg(&mut tokens)?),
            "SNAPSHOT" => Command::Snapshot,
            "MIN" => Command::Min(key_arg(&mut tokens)?),
            "MAX" => Command::Max(key_arg(&mut tokens)?),
            "SUM" => Command::Sum(key_arg(&mut tokens)?),
            "LEN" => Command::Len(key_arg(&mut tokens)?),
            "REV" => Command::Rev(key_arg(&mut tokens)?),
            "UNIQ" => Command::Uniq(key_arg(&mut tokens)?),
            "SORT" => Command::Sort(key_arg(&mut tokens)?),
            "FORWARD" => Command::Forward(key_arg(&mut tokens)?),
            "BACKWARD" => Command::Backward(key_arg(&mut tokens)?),
            "TYPE" => Command::Type(key_arg(&mut tokens)?),
            "" => err_at!(NoSuchCommand, msg: "empty line")?,
            verb => err_at!(NoSuchCommand, msg: "{}", verb)?,
        };

        Ok(cmd)
    }

    /// Apply this command against `db`, return the structured reply.
    pub fn apply(&self, db: &mut Db) -> Result<Reply> {
        let reply = match self {
            Command::Help => Reply::Help,
            Command::Bye => {
                db.clear();
                Reply::Bye
            }
            Command::List(ListWhat::Keys) => Reply::Keys(db.list_keys()),
            Command::List(ListWhat::Entries) => Reply::Entries(db.list_entries()),
            Command::List(ListWhat::Snapshots) => Reply::Snapshots(db.list_snapshots()),
            Command::Get(key) => Reply::Elems(db.get(key)?),
            Command::Del(key) => {
                db.del(key)?;
                Reply::Ok
            }
            Command::Purge(key) => {
                db.purge(key.as_deref())?;
                Reply::Ok
            }
            Command::Set { key, values } => {
                db.set(key, values)?;
                Reply::Ok
            }
            Command::Push { key, values } => {
                db.push(key, values)?;
                Reply::Ok
            }
            Command::Append { key, values } => {
                db.append(key, values)?;
                Reply::Ok
            }
            Command::Pick { key, index } => Reply::Elem(db.pick(key, *index)?),
            Command::Pluck { key, index } => Reply::Elem(db.pluck(key, *index)?),
            Command::Pop(key) => Reply::Elem(db.pop(key)?),
            Command::Drop(id) => {
                db.drop_snapshot(*id)?;
                Reply::Ok
            }
            Command::Rollback(id) => {
                db.rollback(*id)?;
                Reply::Ok
            }
            Command::Checkout(id) => {
                db.checkout(*id)?;
                Reply::Ok
            }
            Command::Snapshot => Reply::Saved(db.snapshot()),
            Command::Min(key) => Reply::Int(db.min(key)?),
            Command::Max(key) => Reply::Int(db.max(key)?),
            Command::Sum(key) => Reply::Sum(db.sum(key)?),
            Command::Len(key) => Reply::Count(db.count(key)?),
            Command::Rev(key) => {
                db.rev(key)?;
                Reply::Ok
            }
            Command::Uniq(key) => {
                db.uniq(key)?;
                Reply::Ok
            }
            Command::Sort(key) => {
                db.sort(key)?;
                Reply::Ok
            }
            Command::Forward(key) => Reply::Closure(db.forward(key)?),
            Command::Backward(key) => Reply::Closure(db.backward(key)?),
            Command::Type(key) => Reply::Type { simple: db.is_simple(key)? },
        };

        Ok(reply)
    }
}

// commands over a small fixed key alphabet, for randomized sessions.
impl<'a> arbitrary::Arbitrary<'a> for Command {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        const KEYS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

        let key = u.choose(&KEYS)?.to_string();
        let n_values = (u.arbitrary::<u8>()? % 4) as usize;
        let mut values = vec![];
        for _ in 0..n_values {
            let value = match u.arbitrary::<u8>()? % 3 {
                0 => u.choose(&KEYS)?.to_string(),
                _ => format!("{}", u.arbitrary::<i8>()?),
            };
            values.push(value);
        }
        let index = ((u.arbitrary::<u8>()? % 4) + 1) as usize;
        let id = (((u.arbitrary::<u8>()? % 4) + 1)) as u64;

        let cmd = match u.arbitrary::<u8>()? % 24 {
            0 => Command::List(*u.choose(&[
                ListWhat::Keys,
                ListWhat::Entries,
                ListWhat::Snapshots,
            ])?),
            1 => Command::Get(key),
            2 => Command::Del(key),
            3 => Command::Purge(Some(key)),
            4..=6 => Command::Set { key, values },
            7 => Command::Push { key, values },
            8 => Command::Append { key, values },
            9 => Command::Pick { key, index },
            10 => Command::Pluck { key, index },
            11 => Command::Pop(key),
            12 => Command::Drop(id),
            13 => Command::Rollback(id),
            14 => Command::Checkout(id),
            15 => Command::Snapshot,
            16 => Command::Min(key),
            17 => Command::Max(key),
            18 => Command::Sum(key),
            19 => Command::Len(key),
            20 => Command::Rev(key),
            21 => Command::Uniq(key),
            22 => Command::Sort(key),
            _ => Command::Type(key),
        };

        Ok(cmd)
    }
}

/// Rendered element, ready for display at the prompt. A reference
/// element renders as its target's key, [Repr::Nil] is the
/// take-from-an-empty-entry reply.
#[derive(Clone, PartialEq, Debug)]
pub enum Repr {
    Int(i32),
    Key(String),
    Nil,
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match self {
            Repr::Int(num) => write!(f, "{}", num),
            Repr::Key(key) => write!(f, "{}", key),
            Repr::Nil => write!(f, "nil"),
        }
    }
}

impl Repr {
    fn from_element(element: &Element, state: &State) -> Repr {
        match element {
            Element::Int(num) => Repr::Int(*num),
            Element::Ref(id) => Repr::Key(state.entry(*id).as_key().to_string()),
        }
    }
}

/// Reply type, the structured result of applying one command. The
/// REPL owns the final rendering, refer to [crate::Repl].
#[derive(Clone, PartialEq, Debug)]
pub enum Reply {
    Ok,
    Elem(Repr),
    Elems(Vec<Repr>),
    Keys(Vec<String>),
    Entries(Vec<(String, Vec<Repr>)>),
    Snapshots(Vec<u64>),
    Closure(Vec<String>),
    Int(i32),
    Sum(i64),
    Count(usize),
    Saved(u64),
    Type { simple: bool },
    Help,
    Bye,
}

/// Db type, the top-level command façade holding the live state and
/// the snapshot store.
#[derive(Clone, Default, Debug)]
pub struct Db {
    state: State,
    snaps: SnapshotStore,
}

impl Db {
    pub fn new() -> Db {
        Db::default()
    }

    /// Return the live state.
    #[inline]
    pub fn as_state(&self) -> &State {
        &self.state
    }

    /// Return the snapshot store.
    #[inline]
    pub fn as_snapshots(&self) -> &SnapshotStore {
        &self.snaps
    }

    pub(crate) fn clear(&mut self) {
        debug!(target: "cmd", "clearing {} entries", self.state.len());
        self.state = State::new();
        self.snaps = SnapshotStore::new();
    }
}

impl Db {
    /// Render `key`'s elements in order.
    pub fn get(&self, key: &str) -> Result<Vec<Repr>> {
        let entry = self.state.get(key)?;
        let reprs = entry
            .as_elements()
            .iter()
            .map(|e| Repr::from_element(e, &self.state))
            .collect();
        Ok(reprs)
    }

    /// Replace `key`'s elements with the parsed `values`, creating
    /// the entry at the end of the insertion order when absent. The
    /// whole value list is parsed and checked before any mutation.
    pub fn set(&mut self, key: &str, values: &[String]) -> Result<()> {
        let exist: Option<Id> = self.state.get(key).ok().map(|e| e.to_id());
        let elements = parse_elements(&self.state, key, exist, values)?;

        let id = match exist {
            Some(id) => {
                self.state.deref_all(id);
                self.state.clear_elements(id);
                id
            }
            None => self.state.insert_new(key),
        };
        self.state.extend_elements(id, &elements);
        self.state.ref_all(id, &elements);

        debug!(target: "cmd", "set {} with {} elements", key, elements.len());
        Ok(())
    }

    /// Insert the parsed `values` at the front of `key`'s elements,
    /// first value ending up front-most.
    pub fn push(&mut self, key: &str, values: &[String]) -> Result<()> {
        let id = self.state.get(key)?.to_id();
        let mut elements = parse_elements(&self.state, key, Some(id), values)?;

        elements.reverse();
        self.state.splice_front(id, &elements);
        self.state.ref_all(id, &elements);

        Ok(())
    }

    /// Append the parsed `values` at the back of `key`'s elements.
    pub fn append(&mut self, key: &str, values: &[String]) -> Result<()> {
        let id = self.state.get(key)?.to_id();
        let elements = parse_elements(&self.state, key, Some(id), values)?;

        self.state.extend_elements(id, &elements);
        self.state.ref_all(id, &elements);

        Ok(())
    }

    /// Render the element at 1-based `index` of `key`.
    pub fn pick(&self, key: &str, index: usize) -> Result<Repr> {
        let entry = self.state.get(key)?;
        if index == 0 || index > entry.len() {
            err_at!(IndexOutOfRange, msg: "{} in {}..={}", index, 1, entry.len())?
        }
        Ok(Repr::from_element(&entry.as_elements()[index - 1], &self.state))
    }

    /// As [Db::pick], and additionally remove the element, unlinking
    /// it from the closures when it is a reference.
    pub fn pluck(&mut self, key: &str, index: usize) -> Result<Repr> {
        let repr = self.pick(key, index)?;

        let id = self.state.get(key)?.to_id();
        let element = self.state.remove_element_at(id, index - 1);
        if let Element::Ref(v) = element {
            self.state.unlink(id, v);
        }

        Ok(repr)
    }

    /// Remove and render the front element of `key`. Taking from an
    /// empty entry replies nil and removes nothing.
    pub fn pop(&mut self, key: &str) -> Result<Repr> {
        if self.state.get(key)?.is_empty() {
            return Ok(Repr::Nil);
        }
        self.pluck(key, 1)
    }

    /// Delete `key` from the live state. Entries referred to by other
    /// entries may not be deleted.
    pub fn del(&mut self, key: &str) -> Result<()> {
        let entry = self.state.get(key)?;
        if !entry.as_backward().is_empty() {
            err_at!(NotPermitted, msg: "{} is referred to", key)?
        }

        let id = entry.to_id();
        self.state.deref_all(id);
        self.state.remove(id);

        debug!(target: "cmd", "deleted {}", key);
        Ok(())
    }

    /// Delete `key` from the live state and from every snapshot,
    /// gated on nothing referring to it in any of those states.
    pub fn purge(&mut self, key: Option<&str>) -> Result<()> {
        let key = match key {
            Some(key) => key,
            None => return Ok(()),
        };

        if !self.state.can_purge(key) || !self.snaps.can_purge(key) {
            err_at!(NotPermitted, msg: "{} is referred to in some state", key)?
        }

        self.state.purge(key);
        self.snaps.purge(key);

        debug!(target: "cmd", "purged {}", key);
        Ok(())
    }

    /// Freeze the live state as a new snapshot, return its id.
    pub fn snapshot(&mut self) -> u64 {
        self.snaps.capture(&self.state)
    }

    /// Drop snapshot `id`.
    pub fn drop_snapshot(&mut self, id: u64) -> Result<()> {
        self.snaps.drop_snapshot(id)
    }

    /// Replace the live state with a copy of snapshot `id` and drop
    /// every newer snapshot.
    pub fn rollback(&mut self, id: u64) -> Result<()> {
        self.state = self.snaps.rollback(id)?;
        Ok(())
    }

    /// Replace the live state with a copy of snapshot `id`, leaving
    /// the snapshot store untouched.
    pub fn checkout(&mut self, id: u64) -> Result<()> {
        self.state = self.snaps.checkout(id)?;
        Ok(())
    }

    /// Minimum integer reachable from `key`, recursing through
    /// references.
    pub fn min(&self, key: &str) -> Result<i32> {
        Ok(self.state.min(self.state.get(key)?.to_id()))
    }

    /// Maximum integer reachable from `key`, recursing through
    /// references.
    pub fn max(&self, key: &str) -> Result<i32> {
        Ok(self.state.max(self.state.get(key)?.to_id()))
    }

    /// Sum of integers reachable from `key`, accumulated in 64-bit.
    pub fn sum(&self, key: &str) -> Result<i64> {
        Ok(self.state.sum(self.state.get(key)?.to_id()))
    }

    /// Count of leaf integers reachable from `key`.
    pub fn count(&self, key: &str) -> Result<usize> {
        Ok(self.state.count(self.state.get(key)?.to_id()))
    }

    /// Reverse the element order of a simple entry.
    pub fn rev(&mut self, key: &str) -> Result<()> {
        let id = self.simple_id(key)?;
        self.state.entry_mut(id).elements.reverse();
        Ok(())
    }

    /// Remove adjacent duplicate values of a simple entry.
    pub fn uniq(&mut self, key: &str) -> Result<()> {
        let id = self.simple_id(key)?;
        let elements = &mut self.state.entry_mut(id).elements;
        elements.dedup_by(|a, b| a.cmp_int(b) == std::cmp::Ordering::Equal);
        Ok(())
    }

    /// Sort the values of a simple entry ascending.
    pub fn sort(&mut self, key: &str) -> Result<()> {
        let id = self.simple_id(key)?;
        let elements = &mut self.state.entry_mut(id).elements;
        elements.sort_unstable_by(|a, b| a.cmp_int(b));
        Ok(())
    }

    /// Keys reachable from `key`, sorted ascending, de-duplicated.
    pub fn forward(&self, key: &str) -> Result<Vec<String>> {
        let entry = self.state.get(key)?;
        Ok(self.state.closure_keys(entry.as_forward()))
    }

    /// Keys that can reach `key`, sorted ascending, de-duplicated.
    pub fn backward(&self, key: &str) -> Result<Vec<String>> {
        let entry = self.state.get(key)?;
        Ok(self.state.closure_keys(entry.as_backward()))
    }

    /// Return whether `key` is a simple entry.
    pub fn is_simple(&self, key: &str) -> Result<bool> {
        Ok(self.state.get(key)?.is_simple())
    }

    /// Keys of the live state in insertion order.
    pub fn list_keys(&self) -> Vec<String> {
        self.state.iter().map(|e| e.as_key().to_string()).collect()
    }

    /// Key and rendered elements of every live entry, in insertion
    /// order.
    pub fn list_entries(&self) -> Vec<(String, Vec<Repr>)> {
        self.state
            .iter()
            .map(|e| {
                let reprs = e
                    .as_elements()
                    .iter()
                    .map(|ele| Repr::from_element(ele, &self.state))
                    .collect();
                (e.as_key().to_string(), reprs)
            })
            .collect()
    }

    /// Snapshot ids, newest first.
    pub fn list_snapshots(&self) -> Vec<u64> {
        self.snaps.iter().map(|s| s.to_id()).collect()
    }

    // resolve a simple entry's handle, the REV/UNIQ/SORT gate.
    fn simple_id(&self, key: &str) -> Result<Id> {
        let entry = self.state.get(key)?;
        if !entry.is_simple() {
            err_at!(NotSimple, msg: "{}", key)?
        }
        Ok(entry.to_id())
    }
}

/// Clip a key token at [KEY_LIMIT] characters, the identity entries
/// are stored and looked up under.
fn to_key(token: &str) -> String {
    token.chars().take(KEY_LIMIT).collect()
}

// a token opening with a digit or a minus must lex as an integer.
fn looks_like_int(token: &str) -> bool {
    matches!(token.chars().next(), Some(c) if c.is_ascii_digit() || c == '-')
}

fn parse_int(token: &str) -> Result<i32> {
    match token.parse::<i64>() {
        Ok(num) if num >= (i32::MIN as i64) && num <= (i32::MAX as i64) => Ok(num as i32),
        Ok(num) => err_at!(InvalidInteger, msg: "{} out of range", num),
        Err(err) => err_at!(InvalidInteger, msg: "{} {}", token, err),
    }
}

fn parse_index(token: &str) -> Result<usize> {
    match token.parse::<usize>() {
        Ok(num) if num > 0 => Ok(num),
        Ok(num) => err_at!(IndexOutOfRange, msg: "{} is not 1-based", num),
        Err(err) => err_at!(IndexOutOfRange, msg: "{} {}", token, err),
    }
}

fn key_arg<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<String> {
    match tokens.next() {
        Some(token) => Ok(to_key(token)),
        None => err_at!(NoSuchKey, msg: "missing key"),
    }
}

// exactly one index token may follow, trailing junk is out of range.
fn index_arg<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<usize> {
    let token = match tokens.next() {
        Some(token) => token,
        None => err_at!(IndexOutOfRange, msg: "missing index")?,
    };
    if tokens.next().is_some() {
        err_at!(IndexOutOfRange, msg: "trailing tokens after index")?
    }
    parse_index(token)
}

fn id_arg<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<u64> {
    let token = match tokens.next() {
        Some(token) => token,
        None => err_at!(IndexOutOfRange, msg: "missing snapshot id")?,
    };
    if tokens.next().is_some() {
        err_at!(IndexOutOfRange, msg: "trailing tokens after snapshot id")?
    }
    match token.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        Ok(id) => err_at!(IndexOutOfRange, msg: "{} is not 1-based", id),
        Err(err) => err_at!(IndexOutOfRange, msg: "{} {}", token, err),
    }
}

/// Parse element tokens against `state`. Integers must fit 32-bit,
/// keys must exist, and a reference may neither name `key` itself nor
/// close a cycle back to `id`. Nothing is mutated here, a failed
/// parse fails the whole command.
fn parse_elements(
    state: &State,
    key: &str,
    id: Option<Id>,
    values: &[String],
) -> Result<Vec<Element>> {
    let mut elements = Vec::new();
    err_at!(OutOfMemory, elements.try_reserve(values.len()))?;

    for token in values.iter() {
        let element = if looks_like_int(token) {
            Element::of_int(parse_int(token)?)
        } else {
            let target = to_key(token);
            if target == key {
                err_at!(NotPermitted, msg: "{} referring to itself", key)?
            }
            let entry = state.get(&target)?;
            if let Some(u) = id {
                if state.creates_cycle(u, entry.to_id()) {
                    err_at!(NotPermitted, msg: "{} -> {} closes a cycle", key, target)?
                }
            }
            Element::of_ref(entry.to_id())
        };
        elements.push(element);
    }

    Ok(elements)
}

#[cfg(test)]
#[path = "cmd_test.rs"]
mod cmd_test;
