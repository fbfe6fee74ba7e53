//! Dumps the parsed tree of one Go file, then prints its rewritten text.
//!
//! `cargo run --example parse -- <file.go>`

use std::path::Path;
use std::process::ExitCode;
use std::{env, fs};

use sigfold::rewrite::locate_signatures;

fn main() -> ExitCode {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: cargo run --example parse -- <file.go>");
        return ExitCode::from(2);
    };
    let src = match fs::read_to_string(&path) {
        Ok(src) => src,
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    match sigfold_parser::parse_source(&src) {
        Ok(unit) => {
            println!("{:#?}", unit.file);
            println!("{} signatures", locate_signatures(&unit).len());
        }
        Err(failure) => {
            eprintln!("parse failed");
            for d in &failure.diags {
                eprintln!("{:?} {}..{}: {}", d.kind, d.span.start, d.span.end, d.message);
            }
            return ExitCode::FAILURE;
        }
    }

    match sigfold::format_source(Path::new(&path), &src) {
        Ok(out) => {
            print!("{}", out.text);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
