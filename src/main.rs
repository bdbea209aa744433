use std::{path::PathBuf, process};

use clap::Parser;

/// bpl is an interpreter for BPL+, a small BASIC-inspired scripting
/// language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The script to execute; must be a .bpl file.
    script: PathBuf,
}

fn main() {
    let args = Args::parse();

    if args.script.extension().is_none_or(|ext| ext != "bpl") {
        eprintln!("Error: expected a .bpl file, got {:?}", args.script);
        process::exit(1);
    }

    if let Err(e) = bpl::run_file(&args.script) {
        eprintln!("{e}");
        process::exit(1);
    }
}
