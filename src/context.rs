//! Per-file assembler state, threaded through the pre-processor and both
//! passes. Resolves spec.md's Design Notes item on re-architecting the
//! original's process-wide globals (`IC`, `DC`, the two images, the error
//! flag) as a value that is constructed fresh for every input file instead
//! of being reset in place.

use crate::error::Error;
use crate::macros::MacroTable;
use crate::symbol::SymbolTable;

pub const MEMORY_SIZE: usize = 256;
pub const IC_INITIAL: u32 = 100;

/// One textual occurrence of an external symbol in an operand position.
#[derive(Debug, Clone)]
pub struct ExternalUsage {
    pub name: String,
    pub address: u32,
}

/// Everything the pipeline needs for one input file, created fresh per
/// file and dropped at the end of its pipeline.
pub struct AssemblerContext {
    pub path: String,
    pub ic: u32,
    pub dc: u32,
    pub icf: u32,
    pub instruction_image: Vec<u32>,
    pub data_image: Vec<u32>,
    pub symbols: SymbolTable,
    pub macros: MacroTable,
    pub externals: Vec<ExternalUsage>,
    pub has_error: bool,
}

impl AssemblerContext {
    pub fn new(path: impl Into<String>) -> AssemblerContext {
        AssemblerContext {
            path: path.into(),
            ic: IC_INITIAL,
            dc: 0,
            icf: IC_INITIAL,
            instruction_image: Vec::new(),
            data_image: Vec::new(),
            symbols: SymbolTable::new(),
            macros: MacroTable::new(),
            externals: Vec::new(),
            has_error: false,
        }
    }

    /// Record a diagnostic against `line_number` and set the error flag.
    pub fn error(&mut self, line_number: usize, error: Error) {
        crate::diagnostics::report(&self.path, line_number, &error);
        self.has_error = true;
    }

    /// Reset IC to its initial value for the second pass; data layout
    /// (DC, data_image, ICF) is already finalized and left untouched.
    pub fn begin_second_pass(&mut self) {
        self.icf = self.ic;
        self.ic = IC_INITIAL;
    }

    /// Append a word to the data image, failing if the combined image
    /// would exceed [`MEMORY_SIZE`].
    pub fn push_data_word(&mut self, word: u32) -> Result<(), Error> {
        if (self.ic.saturating_sub(IC_INITIAL) as usize) + self.data_image.len() >= MEMORY_SIZE {
            return Err(Error::MemoryOverflow);
        }
        self.data_image.push(word & 0x3FF);
        self.dc += 1;
        Ok(())
    }

    /// Append a word to the instruction image at the current IC, failing
    /// if the combined image would exceed [`MEMORY_SIZE`].
    pub fn push_instruction_word(&mut self, word: u32) -> Result<(), Error> {
        if (self.ic.saturating_sub(IC_INITIAL) as usize) + self.data_image.len() >= MEMORY_SIZE {
            return Err(Error::MemoryOverflow);
        }
        self.instruction_image.push(word & 0x3FF);
        self.ic += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_ic_at_100_and_dc_at_zero() {
        let ctx = AssemblerContext::new("prog");
        assert_eq!(ctx.ic, IC_INITIAL);
        assert_eq!(ctx.dc, 0);
        assert!(!ctx.has_error);
    }

    #[test]
    fn second_pass_resets_ic_but_keeps_data_layout() {
        let mut ctx = AssemblerContext::new("prog");
        ctx.ic = 108;
        ctx.dc = 4;
        ctx.begin_second_pass();
        assert_eq!(ctx.ic, IC_INITIAL);
        assert_eq!(ctx.icf, 108);
        assert_eq!(ctx.dc, 4);
    }

    #[test]
    fn push_instruction_word_masks_to_ten_bits() {
        let mut ctx = AssemblerContext::new("prog");
        ctx.push_instruction_word(0x7FF).unwrap();
        assert_eq!(ctx.instruction_image[0], 0x3FF);
        assert_eq!(ctx.ic, 101);
    }

    #[test]
    fn rejects_appends_past_the_combined_256_word_limit() {
        let mut ctx = AssemblerContext::new("prog");
        ctx.ic = IC_INITIAL + (MEMORY_SIZE as u32);
        assert!(ctx.push_instruction_word(0).is_err());
        assert!(ctx.push_data_word(0).is_err());
    }
}
