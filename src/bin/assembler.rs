use std::env;
use std::process::ExitCode;

use colored::Colorize;
use tenbit_asm::driver::process_file;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: {} <base1> [<base2> ...]", args.first().map(String::as_str).unwrap_or("assembler"));
        println!("Each base name refers to a '<base>.as' source file (no extension).");
        return ExitCode::FAILURE;
    }

    let mut all_succeeded = true;

    for base in &args[1..] {
        if let Err(reason) = validate_basename(base) {
            eprintln!("{} '{base}': {reason}", "Skipping".red().bold());
            all_succeeded = false;
            continue;
        }

        if !process_file(base) {
            all_succeeded = false;
        }
    }

    if all_succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Mirrors the original's `validate_filename`: alnum/underscore/hyphen
/// only, first character alphabetic or underscore, length 1..=50.
fn validate_basename(name: &str) -> Result<(), &'static str> {
    if name.is_empty() || name.len() > 50 {
        return Err("base name must be 1-50 characters");
    }
    let mut chars = name.chars();
    let first = chars.next().unwrap();
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err("base name must start with a letter or underscore");
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err("base name may only contain letters, digits, '_' and '-'");
    }
    Ok(())
}
