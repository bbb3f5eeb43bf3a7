//! Check or canonicalize a LispIsh expression.
//!
//! Reads FILE, or stdin if FILE is absent or `-`.
//! Prints the canonical form on stdout, or with `--check` prints nothing.
//! A parse error is printed on stderr, with its position, and the exit code is 1.
//! Bad arguments or unreadable input exit with 2.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "lispish", version)]
#[command(about = "Check or canonicalize a LispIsh expression", long_about = None)]
struct Args {
    /// Only check that the input parses; print nothing on success
    #[arg(short, long)]
    check: bool,

    /// Input file, or - for stdin
    file: Option<PathBuf>,
}

impl Args {
    /// The file to read, or `None` for stdin.
    fn input_path(&self) -> Option<&Path> {
        self.file.as_deref().filter(|path| *path != Path::new("-"))
    }
}

fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut input = String::new();
            std::io::stdin().lock().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let input = match read_input(args.input_path()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("error: could not read input: {e}");
            return ExitCode::from(2);
        }
    };

    match lispish::parse(&input) {
        Ok(tree) => {
            if !args.check {
                println!("{}", tree.emit(0));
            }
            ExitCode::SUCCESS
        }
        Err(e) if e.is_incomplete() => {
            eprintln!("error: incomplete input: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
