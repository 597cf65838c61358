//! Command-line interface (CLI) for climb-calc
//!
//! Reads a calculator script (by default `input.txt` in the working
//! directory), evaluates it in a fresh [`Session`], prints every result on
//! standard output and every diagnostic on standard error.
//!
//! Set `RUST_LOG=debug` (or `trace`) to watch the lexer and evaluator work.

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use climb_calc::{Config, NameGrammar, Session};
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file with calculator statements
    #[arg(short, long, default_value = "input.txt")]
    input: PathBuf,

    /// Only accept the memory slots MEM_1 .. MEM_10 as variable names
    #[arg(long)]
    slots: bool,

    /// Skip to the next line after a syntax error instead of stopping
    #[arg(short, long)]
    keep_going: bool,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Config {
            names: if args.slots {
                NameGrammar::MemorySlots
            } else {
                NameGrammar::Free
            },
            keep_going: args.keep_going,
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let args = Args::parse();

    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            eprintln!("file not found: {}", args.input.display());
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("can't read {:?}", args.input));
        }
    };

    let mut session = Session::new(Config::from(&args));
    let transcript = session.run(&source);
    log::info!("lexer stats: {:?}", transcript.lexer_stats);
    log::info!("parser stats: {:?}", transcript.parser_stats);
    for (name, value) in session.symtab().iter() {
        log::debug!("final binding: {name} = {value}");
    }

    transcript
        .render(&mut io::stdout().lock(), &mut io::stderr().lock())
        .context("can't write results")?;

    Ok(if transcript.completed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
