//! Per-file pipeline orchestration: pre-process, first pass, second pass,
//! emit outputs. Grounded on `assembler.c`'s `process_single_file`, minus
//! its stage-by-stage console progress printfs — this driver only reports
//! the diagnostics each stage raises, leaving progress narration to the
//! caller.

use std::fs;
use std::path::Path;

use crate::base4;
use crate::context::AssemblerContext;
use crate::error::Error;
use crate::first_pass::first_pass;
use crate::preprocessor::preprocess;
use crate::second_pass::second_pass;

/// Assemble one base name (no extension): `<base>.as` in, `<base>.am`
/// always (if the pre-processor gets far enough to produce one),
/// `<base>.ob`/`.ent`/`.ext` only on a clean run. Returns `true` on
/// success.
pub fn process_file(base: &str) -> bool {
    let source_path = format!("{base}.as");
    let source = match fs::read_to_string(&source_path) {
        Ok(text) => text,
        Err(_) => {
            let mut ctx = AssemblerContext::new(&source_path);
            ctx.error(0, Error::FileOpen(source_path.clone()));
            return false;
        }
    };

    let mut ctx = AssemblerContext::new(&source_path);
    let expanded = preprocess(&mut ctx, &source);

    let am_path = format!("{base}.am");
    if ctx.has_error {
        let _ = fs::remove_file(&am_path);
        return false;
    }
    if fs::write(&am_path, &expanded).is_err() {
        ctx.error(0, Error::FileCreate(am_path));
        return false;
    }

    first_pass(&mut ctx, &expanded);
    if !ctx.has_error {
        second_pass(&mut ctx, &expanded);
    }

    if ctx.has_error {
        return false;
    }

    write_outputs(base, &ctx).is_ok()
}

fn write_outputs(base: &str, ctx: &AssemblerContext) -> std::io::Result<()> {
    write_object_file(Path::new(&format!("{base}.ob")), ctx)?;

    let mut entries = ctx.symbols.entries().peekable();
    if entries.peek().is_some() {
        let mut lines = String::new();
        for symbol in entries {
            lines.push_str(&format!("{} {}\n", symbol.name, base4::encode(symbol.address)));
        }
        fs::write(format!("{base}.ent"), lines)?;
    }

    if !ctx.externals.is_empty() {
        let mut lines = String::new();
        for usage in &ctx.externals {
            lines.push_str(&format!("{} {}\n", usage.name, base4::encode(usage.address)));
        }
        fs::write(format!("{base}.ext"), lines)?;
    }

    Ok(())
}

fn write_object_file(path: &Path, ctx: &AssemblerContext) -> std::io::Result<()> {
    let code_size = ctx.icf - crate::context::IC_INITIAL;
    let data_size = ctx.dc;

    let mut contents = format!(
        "{} {}\n",
        base4::encode(code_size),
        base4::encode(data_size)
    );

    for (offset, word) in ctx.instruction_image.iter().enumerate() {
        let address = crate::context::IC_INITIAL + offset as u32;
        contents.push_str(&format!("{} {}\n", base4::encode(address), base4::encode(*word)));
    }
    for (offset, word) in ctx.data_image.iter().enumerate() {
        let address = ctx.icf + offset as u32;
        contents.push_str(&format!("{} {}\n", base4::encode(address), base4::encode(*word)));
    }

    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch_base(name: &str) -> String {
        env::temp_dir().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn assembles_a_minimal_program_and_writes_object_file() {
        let base = scratch_base("tenbit_asm_driver_test_minimal");
        fs::write(format!("{base}.as"), "stop\n").unwrap();

        assert!(process_file(&base));

        let ob = fs::read_to_string(format!("{base}.ob")).unwrap();
        assert_eq!(ob, "aaaab aaaaa\nabcba ddaaa\n");

        let _ = fs::remove_file(format!("{base}.as"));
        let _ = fs::remove_file(format!("{base}.am"));
        let _ = fs::remove_file(format!("{base}.ob"));
    }

    #[test]
    fn missing_source_file_fails_cleanly() {
        let base = scratch_base("tenbit_asm_driver_test_missing");
        let _ = fs::remove_file(format!("{base}.as"));
        assert!(!process_file(&base));
    }

    #[test]
    fn erroring_program_produces_no_outputs() {
        let base = scratch_base("tenbit_asm_driver_test_error");
        fs::write(format!("{base}.as"), "mov #1, #2\n").unwrap();

        assert!(!process_file(&base));
        assert!(fs::metadata(format!("{base}.ob")).is_err());

        let _ = fs::remove_file(format!("{base}.as"));
        let _ = fs::remove_file(format!("{base}.am"));
    }
}
