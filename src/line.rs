//! Classifies one already-expanded source line into label / command /
//! operands, per spec.md §4.3.
//!
//! spec.md's literal algorithm caps the parser at two named operand slots
//! and flags any further token as a parse error. Read against the original
//! it's distilled from, that cap makes any `.data`/`.mat` directive with
//! more than two comma-separated values an unconditional parse error —
//! which can't be right for a directive whose whole syntax is `<int>(,
//! <int>)*`. spec.md's own Design Notes flag this ("ParsedLine arity
//! limit") and explicitly sanction the fix: "replace the parser with a
//! variadic operand collector — the latter is cleaner." That's what this
//! does: every token after the command is collected into `operands`, and
//! operand-count mismatches are diagnosed per-construct (instruction arity
//! in isa::operand_arity, directive value counts in first_pass) rather
//! than by a blanket "more than 4 tokens total" rule.

use crate::lex::{is_comment, is_empty, tokenize};

/// A single source line, lexically classified but not yet semantically
/// validated (that happens in the first/second pass against the ISA
/// tables and symbol table).
#[derive(Debug, Clone, Default)]
pub struct ParsedLine<'a> {
    pub label: Option<&'a str>,
    pub command: Option<&'a str>,
    pub operands: Vec<&'a str>,
    pub is_directive: bool,
    pub is_empty: bool,
}

impl<'a> ParsedLine<'a> {
    fn empty() -> ParsedLine<'a> {
        ParsedLine {
            is_empty: true,
            ..Default::default()
        }
    }

    /// The first operand, if any (the only operand of a one-operand
    /// instruction, or the source operand of a two-operand one).
    pub fn operand1(&self) -> Option<&'a str> {
        self.operands.first().copied()
    }

    /// The second operand, if any (the destination operand of a
    /// two-operand instruction).
    pub fn operand2(&self) -> Option<&'a str> {
        self.operands.get(1).copied()
    }
}

/// Parse one raw (already macro-expanded) line.
pub fn parse_line(text: &str) -> ParsedLine<'_> {
    if is_empty(text) || is_comment(text) {
        return ParsedLine::empty();
    }

    let tokens = tokenize(text);
    if tokens.is_empty() {
        return ParsedLine::empty();
    }

    let mut index = 0;
    let mut parsed = ParsedLine::default();

    if tokens[0].ends_with(':') {
        parsed.label = Some(&tokens[0][..tokens[0].len() - 1]);
        index = 1;
    }

    if index < tokens.len() {
        let command = tokens[index];
        parsed.command = Some(command);
        parsed.is_directive = command.starts_with('.');
        index += 1;
    }

    parsed.operands = tokens[index..].to_vec();

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_empty_and_comment_lines() {
        assert!(parse_line("").is_empty);
        assert!(parse_line("   ").is_empty);
        assert!(parse_line("  ; a note").is_empty);
    }

    #[test]
    fn parses_label_command_and_operands() {
        let parsed = parse_line("LOOP: mov #3, r1");
        assert_eq!(parsed.label, Some("LOOP"));
        assert_eq!(parsed.command, Some("mov"));
        assert_eq!(parsed.operand1(), Some("#3"));
        assert_eq!(parsed.operand2(), Some("r1"));
        assert!(!parsed.is_directive);
    }

    #[test]
    fn parses_directive_without_label() {
        let parsed = parse_line(".data 1, 2, 3");
        assert_eq!(parsed.label, None);
        assert_eq!(parsed.command, Some(".data"));
        assert!(parsed.is_directive);
        assert_eq!(parsed.operands, vec!["1", "2", "3"]);
    }

    #[test]
    fn collects_more_than_two_operands_variadically() {
        let parsed = parse_line(".data 1, 2, 3, 4, 5");
        assert_eq!(parsed.operands.len(), 5);
    }

    #[test]
    fn zero_operand_instruction_has_no_operands() {
        let parsed = parse_line("stop");
        assert_eq!(parsed.command, Some("stop"));
        assert!(parsed.operands.is_empty());
    }
}
