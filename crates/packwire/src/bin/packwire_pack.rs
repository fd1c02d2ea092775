//! `packwire-pack`: encode JSON (stdin) to MessagePack (stdout).
//!
//! Usage:
//!   packwire-pack
//!
//! Each whitespace-separated JSON document becomes one top-level value.

use packwire::cli::{init_tracing, pack_json, CliError};
use std::io::{self, Read, Write};

fn run() -> Result<(), CliError> {
    if let Some(arg) = std::env::args().nth(1) {
        return Err(CliError::UnknownArgument(arg));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    let bytes = pack_json(&buf)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.flush()?;
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
