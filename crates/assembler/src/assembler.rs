//! Two-pass assembly pipeline.
//!
//! Pass 1 parses every line and assigns addresses: labels take the address
//! of the next instruction, instructions advance the location counter by
//! one word. Pass 2 encodes each instruction against the completed symbol
//! table. Programs assemble from address zero; the loader chooses the base
//! address at load time.

use sim_core::WORD_BYTES;

use crate::encoder::encode_instruction;
use crate::errors::AssembleError;
use crate::parser::{parse_line, Operand, ParsedLine};
use crate::symbols::SymbolTable;

struct PendingInstruction {
    line: usize,
    address: u32,
    mnemonic: String,
    operands: Vec<Operand>,
}

/// Assembles `source` into instruction words.
///
/// # Errors
///
/// Returns the first [`AssembleError`] encountered, with its 1-indexed
/// source line.
pub fn assemble(source: &str) -> Result<Vec<u32>, AssembleError> {
    let mut symbols = SymbolTable::new();
    let mut pending = Vec::new();
    let mut location = 0u32;

    for (index, text) in source.lines().enumerate() {
        let line = index + 1;
        match parse_line(text).map_err(|kind| AssembleError::new(line, kind))? {
            ParsedLine::Blank => {}
            ParsedLine::Label { name } => symbols
                .define(&name, location)
                .map_err(|kind| AssembleError::new(line, kind))?,
            ParsedLine::Instruction { mnemonic, operands } => {
                pending.push(PendingInstruction {
                    line,
                    address: location,
                    mnemonic,
                    operands,
                });
                location = location.wrapping_add(WORD_BYTES);
            }
        }
    }

    pending
        .into_iter()
        .map(|instr| {
            encode_instruction(&instr.mnemonic, &instr.operands, instr.address, &symbols)
                .map_err(|kind| AssembleError::new(instr.line, kind))
        })
        .collect()
}
