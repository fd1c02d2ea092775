//! `packwire-unpack`: decode a MessagePack stream (stdin) to JSON lines (stdout).
//!
//! Usage:
//!   packwire-unpack [--raw] [--pretty]

use packwire::cli::{init_tracing, parse_unpack_args, unpack_stream, CliError};
use std::io::{self, BufWriter};

fn run() -> Result<(), CliError> {
    let options = parse_unpack_args(std::env::args().skip(1))?;
    let stdout = BufWriter::new(io::stdout().lock());
    unpack_stream(io::stdin().lock(), stdout, options)?;
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
