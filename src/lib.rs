//! A two-pass assembler for a small, fixed 16-opcode educational
//! instruction set with a 10-bit machine word and a base-4 "abcd" output
//! encoding.
//!
//! The pipeline per input file: [`preprocessor`] expands `mcro`/`mcroend`
//! blocks, [`first_pass`] builds the symbol table and lays out the data
//! image, [`second_pass`] encodes instructions and resolves references.
//! [`driver`] wires the three stages together and writes the output
//! files; [`context`] is the per-file state threaded through all of them.

pub mod base4;
pub mod context;
pub mod diagnostics;
pub mod directives;
pub mod driver;
pub mod error;
pub mod first_pass;
pub mod isa;
pub mod lex;
pub mod line;
pub mod macros;
pub mod operand;
pub mod preprocessor;
pub mod second_pass;
pub mod symbol;
