//! Second pass: re-walks the macro-expanded source, resolves `.entry`
//! promotions, and encodes every instruction into its machine words, per
//! spec.md §4.7/§4.8. Grounded on `second_pass.c`'s
//! `process_line_second_pass`/`encode_instruction_parsed` and their
//! `encode_*_operand` helpers.

use crate::context::{AssemblerContext, ExternalUsage};
use crate::directives;
use crate::error::Error;
use crate::isa::{self, AddressingMode};
use crate::lex::{is_comment, is_empty};
use crate::line::{parse_line, ParsedLine};
use crate::operand::{addressing_mode_of, parse_matrix_operand, register_number};
use crate::symbol::SymbolAttribute;

const MAX_LINE_LENGTH: usize = 80;

/// ARE tag values, per spec.md §3.
mod are {
    pub const ABSOLUTE: u32 = 0b00;
    pub const EXTERNAL: u32 = 0b01;
    pub const RELOCATABLE: u32 = 0b10;
}

/// Run the second pass over `source` (the same `.am` text the first pass
/// consumed). IC is reset to 100; DC and the data image are already final.
pub fn second_pass(ctx: &mut AssemblerContext, source: &str) {
    ctx.begin_second_pass();

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;

        if line.len() > MAX_LINE_LENGTH || is_empty(line) || is_comment(line) {
            continue; // already diagnosed (or inert) in the first pass
        }

        let parsed = parse_line(line);
        if parsed.is_empty {
            continue;
        }
        let Some(command) = parsed.command else {
            continue;
        };

        let result = if command == ".entry" {
            handle_entry(ctx, &parsed)
        } else if parsed.is_directive {
            Ok(()) // data directives were already laid out in the first pass
        } else {
            encode_instruction(ctx, command, &parsed)
        };

        if let Err(err) = result {
            ctx.error(line_number, err);
        }
    }
}

fn handle_entry(ctx: &mut AssemblerContext, parsed: &ParsedLine) -> Result<(), Error> {
    let name = parsed.operand1().ok_or(Error::MissingOperand)?;
    directives::entry(ctx, name)
}

fn encode_instruction(ctx: &mut AssemblerContext, command: &str, parsed: &ParsedLine) -> Result<(), Error> {
    let opcode = isa::opcode_of(command).ok_or_else(|| Error::UnknownInstruction(command.to_string()))?;
    let arity = isa::operand_arity(opcode);

    if parsed.operands.len() != arity as usize {
        return Err(Error::WrongOperandCount {
            expected: arity,
            found: parsed.operands.len(),
        });
    }

    let (src_text, dest_text) = match arity {
        0 => (None, None),
        1 => (None, parsed.operand1()),
        _ => (parsed.operand1(), parsed.operand2()),
    };

    let src_mode = src_text.map(|t| addressing_mode_of(t).ok_or(Error::IllegalAddressingMode)).transpose()?;
    let dest_mode = dest_text.map(|t| addressing_mode_of(t).ok_or(Error::IllegalAddressingMode)).transpose()?;

    if !isa::is_valid_addressing(opcode, src_mode, dest_mode) {
        return Err(Error::IllegalAddressingMode);
    }

    let instruction_word = (opcode as u32 & 0xF) << 6
        | (src_mode.map(|m| m.index() as u32).unwrap_or(0) & 0x3) << 4
        | (dest_mode.map(|m| m.index() as u32).unwrap_or(0) & 0x3) << 2;
    ctx.push_instruction_word(instruction_word)?;

    if src_mode == Some(AddressingMode::Register) && dest_mode == Some(AddressingMode::Register) {
        let src_reg = register_number(src_text.unwrap()).ok_or(Error::IllegalAddressingMode)?;
        let dest_reg = register_number(dest_text.unwrap()).ok_or(Error::IllegalAddressingMode)?;
        let word = (src_reg as u32 & 0x7) << 5 | (dest_reg as u32 & 0x7) << 2;
        ctx.push_instruction_word(word)?;
        return Ok(());
    }

    if let (Some(text), Some(mode)) = (src_text, src_mode) {
        encode_operand(ctx, text, mode, true)?;
    }
    if let (Some(text), Some(mode)) = (dest_text, dest_mode) {
        encode_operand(ctx, text, mode, false)?;
    }

    Ok(())
}

/// Encode one operand's word(s) and append them to the instruction image.
/// `is_source` only matters for the register case: a lone register's
/// number lands in bits 7-5 as a source or 4-2 as a destination.
fn encode_operand(ctx: &mut AssemblerContext, text: &str, mode: AddressingMode, is_source: bool) -> Result<(), Error> {
    match mode {
        AddressingMode::Immediate => {
            let value: i32 = text.trim_start_matches('#').parse().map_err(|_| Error::InvalidInteger(text.to_string()))?;
            let word = ((value as u32) & 0x3FF) << 2 | are::ABSOLUTE;
            ctx.push_instruction_word(word)
        }
        AddressingMode::Direct => {
            let word = encode_symbol_reference(ctx, text)?;
            ctx.push_instruction_word(word)
        }
        AddressingMode::Matrix => {
            let (label, row, col) = parse_matrix_operand(text).ok_or(Error::IllegalAddressingMode)?;
            let word1 = encode_symbol_reference(ctx, label)?;
            ctx.push_instruction_word(word1)?;
            let word2 = (row as u32 & 0x1F) << 5 | (col as u32 & 0x1F) << 2;
            ctx.push_instruction_word(word2)
        }
        AddressingMode::Register => {
            let reg = register_number(text).ok_or(Error::IllegalAddressingMode)?;
            let word = if is_source { (reg as u32 & 0x7) << 5 } else { (reg as u32 & 0x7) << 2 };
            ctx.push_instruction_word(word)
        }
    }
}

/// Resolve `name` against the symbol table and produce its operand word.
/// Undefined symbols are diagnosed; external references additionally
/// record a usage at the slot this word is about to occupy.
fn encode_symbol_reference(ctx: &mut AssemblerContext, name: &str) -> Result<u32, Error> {
    let symbol = ctx
        .symbols
        .find(name)
        .ok_or_else(|| Error::UndefinedSymbol(name.to_string()))?;

    if symbol.attribute == SymbolAttribute::External {
        // `ctx.ic` already points at the address this operand word is
        // about to occupy: `push_instruction_word` advances it past each
        // word as soon as that word is written, so by the time we reach
        // an unwritten operand slot, `ic` already equals its address.
        let usage_address = ctx.ic;
        ctx.externals.push(ExternalUsage {
            name: name.to_string(),
            address: usage_address,
        });
        Ok(are::EXTERNAL)
    } else {
        Ok((symbol.address & 0x3FF) << 2 | are::RELOCATABLE)
    }
}
