//! The diagnostic taxonomy, per spec.md §7: lexical, semantic, and resource
//! errors that can occur while assembling one file. Every variant carries
//! just enough to render a one-line human message; `path`/`line` context
//! is attached separately by [`crate::diagnostics::report`].

use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    LineTooLong,
    UnterminatedString,
    UnterminatedMacro(String),
    MalformedMatrixDimensions(String),
    UnknownInstruction(String),
    UnknownDirective(String),
    WrongOperandCount { expected: u8, found: usize },
    IllegalAddressingMode,
    InvalidInteger(String),
    InvalidLabel(String),
    ReservedWordCollision(String),
    DuplicateLabel(String),
    UndefinedSymbol(String),
    EntryOnExternal(String),
    MissingOperand,
    MatrixValueCountMismatch { expected: usize, found: usize },
    MemoryOverflow,
    FileOpen(String),
    FileCreate(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LineTooLong => write!(f, "line exceeds 80 characters"),
            Error::UnterminatedString => write!(f, "unterminated string literal"),
            Error::UnterminatedMacro(name) => write!(f, "macro '{name}' is missing a closing mcroend"),
            Error::MalformedMatrixDimensions(text) => {
                write!(f, "malformed matrix dimensions '{text}'")
            }
            Error::UnknownInstruction(name) => write!(f, "unknown instruction '{name}'"),
            Error::UnknownDirective(name) => write!(f, "unknown directive '{name}'"),
            Error::WrongOperandCount { expected, found } => write!(
                f,
                "expected {expected} operand(s), found {found}"
            ),
            Error::IllegalAddressingMode => write!(f, "illegal addressing mode for this instruction"),
            Error::InvalidInteger(text) => write!(f, "invalid integer '{text}' (must be in [-512, 511])"),
            Error::InvalidLabel(name) => write!(f, "invalid label '{name}'"),
            Error::ReservedWordCollision(name) => write!(f, "'{name}' collides with a reserved word"),
            Error::DuplicateLabel(name) => write!(f, "label '{name}' already defined"),
            Error::UndefinedSymbol(name) => write!(f, "undefined symbol '{name}'"),
            Error::EntryOnExternal(name) => {
                write!(f, "'{name}' is declared extern and cannot be an entry")
            }
            Error::MissingOperand => write!(f, "missing operand"),
            Error::MatrixValueCountMismatch { expected, found } => write!(
                f,
                "expected {expected} matrix values, found {found}"
            ),
            Error::MemoryOverflow => write!(f, "program exceeds the 256-word memory image"),
            Error::FileOpen(path) => write!(f, "could not open '{path}'"),
            Error::FileCreate(path) => write!(f, "could not create '{path}'"),
        }
    }
}

impl std::error::Error for Error {}
