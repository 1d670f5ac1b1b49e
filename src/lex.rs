//! Lexical helpers: whitespace trimming, tokenizing, and the closed sets of
//! reserved words (instruction mnemonics, directive names, register names).

use regex::Regex;
use std::sync::OnceLock;

use crate::error::Error;

/// Maximum number of tokens [`tokenize`] will yield from a single line.
pub const MAX_TOKENS: usize = 10;

pub const INSTRUCTIONS: [&str; 16] = [
    "mov", "cmp", "add", "sub", "not", "clr", "lea", "inc", "dec", "jmp", "bne", "red", "prn",
    "jsr", "rts", "stop",
];

pub const DIRECTIVES: [&str; 5] = [".data", ".string", ".mat", ".entry", ".extern"];

pub const REGISTERS: [&str; 8] = ["r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7"];

/// Strip ASCII whitespace from both ends.
pub fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace())
}

pub fn is_empty(line: &str) -> bool {
    line.chars().all(|c| c.is_whitespace())
}

/// A comment line is one whose first non-whitespace character is `;`.
pub fn is_comment(line: &str) -> bool {
    trim(line).starts_with(';')
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^,\s]+").unwrap())
}

/// Split a line on the delimiter set `{space, tab, newline, carriage-return,
/// comma}`, yielding at most [`MAX_TOKENS`] tokens.
pub fn tokenize(line: &str) -> Vec<&str> {
    token_regex()
        .find_iter(line)
        .take(MAX_TOKENS)
        .map(|m| m.as_str())
        .collect()
}

/// A valid label: non-empty, at most 30 characters, starts with an ASCII
/// letter, remaining characters ASCII-alphanumeric, and not a reserved word.
pub fn is_valid_label(name: &str) -> bool {
    if name.is_empty() || name.len() > 30 {
        return false;
    }
    let mut chars = name.chars();
    let first = chars.next().unwrap();
    if !first.is_ascii_alphabetic() {
        return false;
    }
    if !chars.clone().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }
    !is_reserved_word(name)
}

/// Exact match against instructions, directives, or register names.
pub fn is_reserved_word(word: &str) -> bool {
    INSTRUCTIONS.contains(&word) || DIRECTIVES.contains(&word) || REGISTERS.contains(&word)
}

/// Validate a label name for diagnostic purposes, distinguishing a
/// reserved-word collision (spec.md §3 invariant I3) from any other
/// malformed-name shape.
pub fn validate_label(name: &str) -> Result<(), Error> {
    if is_reserved_word(name) {
        return Err(Error::ReservedWordCollision(name.to_string()));
    }
    if !is_valid_label(name) {
        return Err(Error::InvalidLabel(name.to_string()));
    }
    Ok(())
}

/// Parse a base-10 signed integer in `[-512, 511]`. The entire token must
/// be consumed; no partial parses.
pub fn is_valid_integer(s: &str) -> Option<i32> {
    if s.is_empty() {
        return None;
    }
    let value: i32 = s.parse().ok()?;
    if (-512..=511).contains(&value) {
        Some(value)
    } else {
        None
    }
}
