//! Console diagnostic rendering, styled on the teacher's `logging` module:
//! a bold colored tag followed by the message, written to stderr.

use colored::Colorize;

use crate::error::Error;

/// Render one diagnostic in the exact format `Error in file <path>, line
/// <N>: <message>` and write it to stderr.
pub fn report(path: &str, line_number: usize, error: &Error) {
    eprintln!(
        "{} {path}, {} {line_number}: {error}",
        "Error in file".red().bold(),
        "line".red().bold(),
    );
}
