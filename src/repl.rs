//! Module implement the line-oriented prompt on top of [Db].
//!
//! The loop reads one line, parses it into a [Command], applies it
//! and renders the [Reply], or the error's reply string, followed by
//! one blank line. `BYE` replies `bye` and ends the session, end of
//! input ends it silently. Errors never cross a command boundary, the
//! session always continues after a failed command.

use std::io::{BufRead, Write};

use crate::{
    cmd::{Command, Db, Reply, HELP_TEXT},
    Error, Result,
};

/// Configuration for [Repl] type.
#[derive(Clone, Debug)]
pub struct Config {
    /// Print the `"> "` prompt before reading each line. Disabled
    /// when replaying commands from a file.
    pub prompt: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config { prompt: true }
    }
}

impl Config {
    pub fn set_prompt(&mut self, prompt: bool) -> &mut Self {
        self.prompt = prompt;
        self
    }
}

/// Repl type, drives a [Db] from a line-oriented input stream.
pub struct Repl {
    config: Config,
    db: Db,
}

impl Repl {
    pub fn new(config: Config) -> Repl {
        Repl { config, db: Db::new() }
    }

    /// Return the underlying database.
    #[inline]
    pub fn as_db(&self) -> &Db {
        &self.db
    }

    /// Run commands from `input`, writing prompts and replies to
    /// `output`, until `BYE` or end of input.
    pub fn run<R, W>(&mut self, input: R, output: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let mut lines = input.lines();
        loop {
            if self.config.prompt {
                err_at!(IOError, write!(output, "> "))?;
                err_at!(IOError, output.flush())?;
            }
            let line = match lines.next() {
                Some(line) => err_at!(IOError, line)?,
                None => break Ok(()),
            };
            if !self.step(&line, output)? {
                break Ok(());
            }
        }
    }

    // apply one line, false when the session ends.
    fn step<W>(&mut self, line: &str, output: &mut W) -> Result<bool>
    where
        W: Write,
    {
        let res = Command::parse(line).and_then(|cmd| cmd.apply(&mut self.db));
        match res {
            Ok(Reply::Bye) => {
                err_at!(IOError, writeln!(output, "bye"))?;
                Ok(false)
            }
            Ok(reply) => {
                self.render(&reply, output)?;
                err_at!(IOError, writeln!(output))?;
                Ok(true)
            }
            Err(err @ Error::Fatal(_, _)) | Err(err @ Error::IOError(_, _)) => Err(err),
            Err(err) => {
                err_at!(IOError, writeln!(output, "{}", err.to_reply()))?;
                err_at!(IOError, writeln!(output))?;
                Ok(true)
            }
        }
    }

    fn render<W>(&self, reply: &Reply, output: &mut W) -> Result<()>
    where
        W: Write,
    {
        match reply {
            Reply::Ok => err_at!(IOError, writeln!(output, "ok"))?,
            Reply::Elem(repr) => err_at!(IOError, writeln!(output, "{}", repr))?,
            Reply::Elems(reprs) => {
                let values: Vec<String> = reprs.iter().map(|r| r.to_string()).collect();
                err_at!(IOError, writeln!(output, "[{}]", values.join(" ")))?
            }
            Reply::Keys(keys) if keys.is_empty() => {
                err_at!(IOError, writeln!(output, "no keys"))?
            }
            Reply::Keys(keys) => {
                for key in keys.iter() {
                    err_at!(IOError, writeln!(output, "{}", key))?;
                }
            }
            Reply::Entries(entries) if entries.is_empty() => {
                err_at!(IOError, writeln!(output, "no entries"))?
            }
            Reply::Entries(entries) => {
                for (key, reprs) in entries.iter() {
                    let values: Vec<String> =
                        reprs.iter().map(|r| r.to_string()).collect();
                    err_at!(IOError, writeln!(output, "{} [{}]", key, values.join(" ")))?;
                }
            }
            Reply::Snapshots(ids) if ids.is_empty() => {
                err_at!(IOError, writeln!(output, "no snapshots"))?
            }
            Reply::Snapshots(ids) => {
                for id in ids.iter() {
                    err_at!(IOError, writeln!(output, "{}", id))?;
                }
            }
            Reply::Closure(keys) if keys.is_empty() => {
                err_at!(IOError, writeln!(output, "nil"))?
            }
            Reply::Closure(keys) => {
                err_at!(IOError, writeln!(output, "{}", keys.join(", ")))?
            }
            Reply::Int(num) => err_at!(IOError, writeln!(output, "{}", num))?,
            Reply::Sum(num) => err_at!(IOError, writeln!(output, "{}", num))?,
            Reply::Count(num) => err_at!(IOError, writeln!(output, "{}", num))?,
            Reply::Saved(id) => {
                err_at!(IOError, writeln!(output, "saved as snapshot {}", id))?
            }
            Reply::Type { simple: true } => err_at!(IOError, writeln!(output, "simple"))?,
            Reply::Type { simple: false } => {
                err_at!(IOError, writeln!(output, "general"))?
            }
            Reply::Help => err_at!(IOError, write!(output, "{}", *HELP_TEXT))?,
            Reply::Bye => err_at!(IOError, writeln!(output, "bye"))?,
        };

        Ok(())
    }
}

#[cfg(test)]
#[path = "repl_test.rs"]
mod repl_test;
