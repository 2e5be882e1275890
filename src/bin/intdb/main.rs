use structopt::StructOpt;

use std::{ffi, fs, io};

use intdb::{err_at, repl, Error, Repl, Result};

/// Options for command.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "input", help = "replay commands from file instead of stdin")]
    input: Option<ffi::OsString>,

    #[structopt(long = "quiet", help = "do not print the prompt")]
    quiet: bool,
}

fn main() {
    let opts = Opt::from_iter(std::env::args_os());

    let res = run(opts);
    res.map_err(|e| println!("Error: {}", e)).ok();
}

fn run(opts: Opt) -> Result<()> {
    let mut config = repl::Config::default();
    config.set_prompt(opts.input.is_none() && !opts.quiet);

    let mut repl = Repl::new(config);

    let mut output = io::stdout();
    match opts.input {
        Some(file) => {
            let fd = err_at!(IOError, fs::File::open(&file), "{:?}", file)?;
            repl.run(io::BufReader::new(fd), &mut output)
        }
        None => {
            let stdin = io::stdin();
            let input = stdin.lock();
            repl.run(input, &mut output)
        }
    }
}
