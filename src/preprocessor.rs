//! Expands `mcro NAME ... mcroend` blocks into their bodies, turning a
//! `.as` source into its `.am` expansion, per spec.md §4.5.

use crate::context::AssemblerContext;
use crate::error::Error;
use crate::lex::{is_comment, is_empty, tokenize, validate_label};

const MAX_LINE_LENGTH: usize = 80;

/// Strip a line's trailing terminator (`\n`, optionally preceded by `\r`)
/// for classification/tokenizing purposes. The terminator itself is never
/// touched in the output path — callers re-use the original
/// terminator-including slice when copying a line verbatim, which is what
/// makes a macro-free file's `.as` -> `.am` expansion byte-exact (spec.md
/// §8 P7), matching `original_source/pre_assembler.c`'s line-by-line
/// `fgets`/`fputs` instead of Rust's `str::lines()` (which would silently
/// drop a missing final newline or a lone `\r`).
fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Expand every macro definition/call in `source`, recording diagnostics
/// against `ctx` and returning the expanded text.
///
/// Diagnostics never abort the scan early; the caller checks
/// `ctx.has_error` afterwards and is responsible for discarding the
/// returned text (and deleting any partially-written `.am` file) if it is
/// set, per spec.md's "delete the output file on any error" rule.
pub fn preprocess(ctx: &mut AssemblerContext, source: &str) -> String {
    let mut output = String::new();
    let mut lines = source.split_inclusive('\n').enumerate();

    while let Some((index, raw_line)) = lines.next() {
        let line_number = index + 1;
        let content = strip_terminator(raw_line);

        if content.len() > MAX_LINE_LENGTH {
            ctx.error(line_number, Error::LineTooLong);
            continue;
        }

        if is_empty(content) || is_comment(content) {
            output.push_str(raw_line);
            continue;
        }

        let tokens = tokenize(content);

        if tokens.first() == Some(&"mcro") && tokens.len() == 2 {
            let name = tokens[1];
            let name_error = validate_label(name).err();
            let valid = name_error.is_none();
            if let Some(err) = name_error {
                ctx.error(line_number, err);
            }

            let mut body = String::new();
            let mut terminated = false;
            for (_, raw_body_line) in lines.by_ref() {
                if tokenize(strip_terminator(raw_body_line)) == ["mcroend"] {
                    terminated = true;
                    break;
                }
                body.push_str(raw_body_line);
            }

            if !terminated {
                ctx.error(line_number, Error::UnterminatedMacro(name.to_string()));
                continue;
            }

            if valid && !ctx.macros.add(name, body) {
                // Duplicate definitions fail silently, per spec.
            }
            continue;
        }

        if tokens.len() == 1 {
            if let Some(found) = ctx.macros.find(tokens[0]) {
                output.push_str(&found.body);
                continue;
            }
        }

        output.push_str(raw_line);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_a_simple_macro_call() {
        let mut ctx = AssemblerContext::new("prog");
        let source = "mcro GREET\nmov r1, r2\nmcroend\nGREET\nstop\n";
        let expanded = preprocess(&mut ctx, source);
        assert!(!ctx.has_error);
        assert_eq!(expanded, "mov r1, r2\nstop\n");
    }

    #[test]
    fn copies_lines_with_no_macros_verbatim() {
        let mut ctx = AssemblerContext::new("prog");
        let source = "mov r1, r2\n; a comment\n\nstop\n";
        let expanded = preprocess(&mut ctx, source);
        assert!(!ctx.has_error);
        assert_eq!(expanded, source);
    }

    #[test]
    fn duplicate_macro_definitions_fail_silently() {
        let mut ctx = AssemblerContext::new("prog");
        let source = "mcro M\nmov r1, r2\nmcroend\nmcro M\nadd r1, r2\nmcroend\nM\n";
        let expanded = preprocess(&mut ctx, source);
        assert!(!ctx.has_error);
        assert_eq!(expanded, "mov r1, r2\n");
    }

    #[test]
    fn flags_lines_over_eighty_characters() {
        let mut ctx = AssemblerContext::new("prog");
        let long_line = "a".repeat(81);
        let expanded = preprocess(&mut ctx, &long_line);
        assert!(ctx.has_error);
        assert!(expanded.is_empty());
    }

    #[test]
    fn invalid_macro_name_is_rejected_but_body_still_consumed() {
        let mut ctx = AssemblerContext::new("prog");
        let source = "mcro mov\nadd r1, r2\nmcroend\nstop\n";
        let expanded = preprocess(&mut ctx, source);
        assert!(ctx.has_error);
        assert_eq!(expanded, "stop\n");
        assert!(ctx.macros.find("mov").is_none());
    }

    #[test]
    fn preserves_a_missing_trailing_newline_byte_exact() {
        let mut ctx = AssemblerContext::new("prog");
        let source = "mov r1, r2\nstop";
        let expanded = preprocess(&mut ctx, source);
        assert!(!ctx.has_error);
        assert_eq!(expanded, source);
    }

    #[test]
    fn preserves_crlf_line_endings_byte_exact() {
        let mut ctx = AssemblerContext::new("prog");
        let source = "mov r1, r2\r\nstop\r\n";
        let expanded = preprocess(&mut ctx, source);
        assert!(!ctx.has_error);
        assert_eq!(expanded, source);
    }

    #[test]
    fn macro_body_preserves_its_original_line_endings() {
        let mut ctx = AssemblerContext::new("prog");
        let source = "mcro M\r\nmov r1, r2\r\nmcroend\r\nM\r\n";
        let expanded = preprocess(&mut ctx, source);
        assert!(!ctx.has_error);
        assert_eq!(expanded, "mov r1, r2\r\n");
    }
}
