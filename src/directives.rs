//! Directive handlers shared by the first and second pass: `.data`,
//! `.string`, `.mat`, `.extern`, `.entry`. Grounded on
//! `first_pass.c`'s `process_*_directive_parsed` family, adapted to the
//! variadic operand collector in [`crate::line`].

use crate::context::AssemblerContext;
use crate::error::Error;
use crate::lex::is_valid_integer;
use crate::symbol::SymbolAttribute;

/// `.data <int>(,<int>)*` — write each value to the data image.
pub fn data(ctx: &mut AssemblerContext, values: &[&str]) -> Result<(), Error> {
    if values.is_empty() {
        return Err(Error::MissingOperand);
    }
    for value in values {
        let parsed = is_valid_integer(value).ok_or_else(|| Error::InvalidInteger(value.to_string()))?;
        ctx.push_data_word(parsed as u32)?;
    }
    Ok(())
}

/// `.string "<chars>"` — write each byte plus a terminating zero.
///
/// The tokenizer splits on whitespace, which would shred a quoted string
/// containing spaces, so this takes the raw line text (everything after
/// the command keyword) rather than the already-tokenized operands.
pub fn string(ctx: &mut AssemblerContext, raw_operand: &str) -> Result<(), Error> {
    let trimmed = raw_operand.trim();
    if trimmed.len() < 2 || !trimmed.starts_with('"') || !trimmed.ends_with('"') {
        return Err(Error::UnterminatedString);
    }
    let chars = &trimmed[1..trimmed.len() - 1];
    for byte in chars.bytes() {
        ctx.push_data_word(byte as u32)?;
    }
    ctx.push_data_word(0)?;
    Ok(())
}

/// Parse the `[R][C]` dimension prefix of a `.mat` directive.
pub fn parse_matrix_dimensions(text: &str) -> Option<(usize, usize)> {
    let open1 = text.find('[')?;
    let close1 = text[open1..].find(']')? + open1;
    let open2 = text[close1..].find('[')? + close1;
    let close2 = text[open2..].find(']')? + open2;

    let rows: usize = text[open1 + 1..close1].parse().ok()?;
    let cols: usize = text[open2 + 1..close2].parse().ok()?;
    if rows == 0 || cols == 0 {
        return None;
    }
    Some((rows, cols))
}

/// `.mat [R][C] <int>,<int>,...` — require at least `R*C` values; any
/// values beyond `R*C` are accepted but ignored, matching the original's
/// loop condition (`count < expected`) rather than an exact-count check.
pub fn mat(ctx: &mut AssemblerContext, dims: &str, values: &[&str]) -> Result<(), Error> {
    let (rows, cols) = parse_matrix_dimensions(dims)
        .ok_or_else(|| Error::MalformedMatrixDimensions(dims.to_string()))?;
    let expected = rows * cols;

    if values.len() < expected {
        return Err(Error::MatrixValueCountMismatch {
            expected,
            found: values.len(),
        });
    }

    for value in &values[..expected] {
        let parsed = is_valid_integer(value).ok_or_else(|| Error::InvalidInteger(value.to_string()))?;
        ctx.push_data_word(parsed as u32)?;
    }
    Ok(())
}

/// `.extern <name>` — first pass only: declare `name` as an external
/// symbol at address 0.
pub fn extern_decl(ctx: &mut AssemblerContext, name: &str) -> Result<(), Error> {
    crate::lex::validate_label(name)?;
    if ctx.symbols.find(name).is_some() {
        return Err(Error::DuplicateLabel(name.to_string()));
    }
    ctx.symbols.add(name, 0, SymbolAttribute::External);
    Ok(())
}

/// `.entry <name>` — second pass only: promote an existing symbol.
pub fn entry(ctx: &mut AssemblerContext, name: &str) -> Result<(), Error> {
    if ctx.symbols.find(name).map(|s| s.attribute) == Some(SymbolAttribute::External) {
        return Err(Error::EntryOnExternal(name.to_string()));
    }
    if !ctx.symbols.mark_entry(name) {
        return Err(Error::UndefinedSymbol(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_writes_each_value() {
        let mut ctx = AssemblerContext::new("prog");
        data(&mut ctx, &["1", "-2", "3"]).unwrap();
        assert_eq!(ctx.data_image, vec![1, 0x3FE, 3]);
        assert_eq!(ctx.dc, 3);
    }

    #[test]
    fn data_rejects_out_of_range_values() {
        let mut ctx = AssemblerContext::new("prog");
        assert!(data(&mut ctx, &["9999"]).is_err());
    }

    #[test]
    fn string_writes_bytes_plus_terminator() {
        let mut ctx = AssemblerContext::new("prog");
        string(&mut ctx, "\"hi\"").unwrap();
        assert_eq!(ctx.data_image, vec![b'h' as u32, b'i' as u32, 0]);
    }

    #[test]
    fn string_requires_surrounding_quotes() {
        let mut ctx = AssemblerContext::new("prog");
        assert!(string(&mut ctx, "hi").is_err());
    }

    #[test]
    fn mat_parses_dimensions_and_rejects_short_value_lists() {
        assert_eq!(parse_matrix_dimensions("[2][3]"), Some((2, 3)));
        assert_eq!(parse_matrix_dimensions("[0][3]"), None);

        let mut ctx = AssemblerContext::new("prog");
        assert!(mat(&mut ctx, "[2][2]", &["1", "2", "3"]).is_err());
    }

    #[test]
    fn mat_ignores_values_beyond_row_times_col() {
        let mut ctx = AssemblerContext::new("prog");
        mat(&mut ctx, "[1][2]", &["1", "2", "3", "4"]).unwrap();
        assert_eq!(ctx.data_image, vec![1, 2]);
    }

    #[test]
    fn entry_rejects_external_and_undefined_symbols() {
        let mut ctx = AssemblerContext::new("prog");
        ctx.symbols.add("FOO", 0, SymbolAttribute::External);
        assert!(entry(&mut ctx, "FOO").is_err());
        assert!(entry(&mut ctx, "MISSING").is_err());
    }
}
