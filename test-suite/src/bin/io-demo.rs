//! Resolve input and output paths from the command line and echo them.
use std::ffi::OsString;
use std::process::ExitCode;

use argz::{Argz, ParseResult};

fn main() -> ExitCode {
    env_logger::init();

    let mut argz = Argz::from_env();
    if let Err(err) = argz
        .add_value('i', "input text")
        .and_then(|a| a.add_long_value('I', "input", "input file"))
        .and_then(|a| a.add_value('o', "output file"))
        .and_then(|a| a.add_long_value('O', "output", "output file"))
        .and_then(|a| a.add_long_flag('h', "help", "print this help"))
        .and_then(|a| a.add_long_flag('v', "version", "print version"))
    {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    let mut in_file = OsString::new();
    let mut out_file = OsString::new();
    loop {
        let arg = match argz.advance() {
            Ok(Some(arg)) => arg,
            Ok(None) => break,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        };
        match arg {
            ParseResult::Flag('h') => {
                print!("{}", argz.render_help());
                return ExitCode::SUCCESS;
            }
            ParseResult::Flag('v') => {
                println!("{} {}", argz.program().to_string_lossy(), env!("CARGO_PKG_VERSION"));
                return ExitCode::SUCCESS;
            }
            ParseResult::Value('i' | 'I', v) => in_file = v,
            ParseResult::Value('o' | 'O', v) => out_file = v,
            other => log::warn!("ignoring argument {other:?}"),
        }
    }
    log::debug!("input {in_file:?}, output {out_file:?}");

    if in_file.is_empty() {
        eprintln!("Input file must be provided...use -i");
        return ExitCode::FAILURE;
    }
    println!("i: {} O: {}", in_file.to_string_lossy(), out_file.to_string_lossy());
    println!("Success..");
    ExitCode::SUCCESS
}
