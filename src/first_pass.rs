//! First pass: walks the macro-expanded source once, builds the symbol
//! table, lays out the data image, and assigns addresses, per spec.md
//! §4.6. Grounded on `first_pass.c`'s `process_line_first_pass` and its
//! `handle_label_definition`/`process_*_directive_parsed` helpers.

use crate::context::AssemblerContext;
use crate::directives;
use crate::error::Error;
use crate::isa;
use crate::lex::{is_comment, is_empty, validate_label};
use crate::line::{parse_line, ParsedLine};
use crate::operand::addressing_mode_of;
use crate::symbol::SymbolAttribute;

const MAX_LINE_LENGTH: usize = 80;

/// Run the first pass over `source` (the `.am` text), mutating `ctx` in
/// place. Diagnostics are recorded on `ctx`; the caller inspects
/// `ctx.has_error` afterwards.
pub fn first_pass(ctx: &mut AssemblerContext, source: &str) {
    ctx.ic = crate::context::IC_INITIAL;
    ctx.dc = 0;

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;

        if line.len() > MAX_LINE_LENGTH {
            ctx.error(line_number, Error::LineTooLong);
            continue;
        }
        if is_empty(line) || is_comment(line) {
            continue;
        }

        process_line(ctx, line_number, line);
    }

    if !ctx.has_error {
        let icf = ctx.ic;
        ctx.symbols.update_data_symbols(icf);
    }
}

fn process_line(ctx: &mut AssemblerContext, line_number: usize, line: &str) {
    let parsed = parse_line(line);
    if parsed.is_empty {
        return;
    }
    let Some(command) = parsed.command else {
        return;
    };

    if let Err(err) = bind_label(ctx, &parsed, command) {
        ctx.error(line_number, err);
        return;
    }

    let result = if parsed.is_directive {
        dispatch_directive(ctx, command, &parsed, line)
    } else {
        dispatch_instruction(ctx, command, &parsed)
    };

    if let Err(err) = result {
        ctx.error(line_number, err);
    }
}

fn bind_label(ctx: &mut AssemblerContext, parsed: &ParsedLine, command: &str) -> Result<(), Error> {
    let Some(label) = parsed.label else {
        return Ok(());
    };
    if command == ".extern" || command == ".entry" {
        return Ok(());
    }

    validate_label(label)?;
    if ctx.symbols.find(label).is_some() {
        return Err(Error::DuplicateLabel(label.to_string()));
    }

    let (address, attribute) = if parsed.is_directive {
        (ctx.dc, SymbolAttribute::Data)
    } else {
        (ctx.ic, SymbolAttribute::Code)
    };
    ctx.symbols.add(label, address, attribute);
    Ok(())
}

fn dispatch_directive(
    ctx: &mut AssemblerContext,
    command: &str,
    parsed: &ParsedLine,
    raw_line: &str,
) -> Result<(), Error> {
    match command {
        ".data" => directives::data(ctx, &parsed.operands),
        ".string" => {
            let raw_operand = operand_text_after_command(raw_line, command);
            directives::string(ctx, raw_operand)
        }
        ".mat" => {
            let dims = parsed.operand1().ok_or(Error::MissingOperand)?;
            directives::mat(ctx, dims, &parsed.operands[1..])
        }
        ".extern" => {
            let name = parsed.operand1().ok_or(Error::MissingOperand)?;
            directives::extern_decl(ctx, name)
        }
        ".entry" => Ok(()), // resolved in the second pass
        other => Err(Error::UnknownDirective(other.to_string())),
    }
}

fn dispatch_instruction(ctx: &mut AssemblerContext, command: &str, parsed: &ParsedLine) -> Result<(), Error> {
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

    let src_mode = resolve_mode(src_text)?;
    let dest_mode = resolve_mode(dest_text)?;

    if !isa::is_valid_addressing(opcode, src_mode, dest_mode) {
        return Err(Error::IllegalAddressingMode);
    }

    let length = isa::instruction_length(src_mode, dest_mode);
    ctx.ic += length as u32;
    Ok(())
}

/// Only `.string` needs the untokenized text, since its quoted content may
/// contain whitespace the tokenizer would otherwise split on.
fn operand_text_after_command<'a>(line: &'a str, command: &str) -> &'a str {
    match line.find(command) {
        Some(pos) => line[pos + command.len()..].trim(),
        None => line.trim(),
    }
}

/// Resolve an optional operand's addressing mode, diagnosing a malformed
/// operand (one that matches none of the four addressing forms) as an
/// illegal-addressing-mode error rather than silently treating it as
/// absent.
fn resolve_mode(text: Option<&str>) -> Result<Option<crate::isa::AddressingMode>, Error> {
    match text {
        None => Ok(None),
        Some(text) => addressing_mode_of(text)
            .map(Some)
            .ok_or(Error::IllegalAddressingMode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_program_advances_ic_by_one() {
        let mut ctx = AssemblerContext::new("prog");
        first_pass(&mut ctx, "stop\n");
        assert!(!ctx.has_error);
        assert_eq!(ctx.ic, 101);
    }

    #[test]
    fn labels_code_and_data_symbols_distinctly() {
        let mut ctx = AssemblerContext::new("prog");
        first_pass(&mut ctx, "LOOP: mov r1, r2\nNUM: .data 5\nstop\n");
        assert!(!ctx.has_error);
        assert_eq!(ctx.symbols.find("LOOP").unwrap().address, 100);
        // mov r1,r2 (two registers, 2 words) then stop (1 word) => ICF=103;
        // NUM was declared at DC=0, relocated to 0+103.
        assert_eq!(ctx.symbols.find("NUM").unwrap().address, 103);
    }

    #[test]
    fn duplicate_labels_are_diagnosed() {
        let mut ctx = AssemblerContext::new("prog");
        first_pass(&mut ctx, "FOO: stop\nFOO: stop\n");
        assert!(ctx.has_error);
    }

    #[test]
    fn label_on_extern_is_silently_ignored() {
        let mut ctx = AssemblerContext::new("prog");
        first_pass(&mut ctx, "IGNORED: .extern FOO\n");
        assert!(!ctx.has_error);
        assert!(ctx.symbols.find("IGNORED").is_none());
        assert!(ctx.symbols.find("FOO").is_some());
    }

    #[test]
    fn illegal_addressing_mode_is_diagnosed() {
        let mut ctx = AssemblerContext::new("prog");
        first_pass(&mut ctx, "mov #1, #2\n");
        assert!(ctx.has_error);
    }

    #[test]
    fn over_length_line_is_diagnosed_and_processing_continues() {
        let mut ctx = AssemblerContext::new("prog");
        let long_line = "a".repeat(90);
        let source = format!("{long_line}\nstop\n");
        first_pass(&mut ctx, &source);
        assert!(ctx.has_error);
        assert_eq!(ctx.ic, 101);
    }
}
