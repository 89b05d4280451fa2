//! Two-pass assembler for the MIPS-subset simulator.
//!
//! Pass 1 parses source lines and assigns label addresses; pass 2 encodes
//! instructions through the `sim-core` codec, resolving branch and jump
//! targets against the symbol table. The textual word-list format consumed
//! by the simulator loader lives in [`wordfile`].

/// Top-level two-pass assembly pipeline.
pub mod assembler;
/// Instruction encoding against the symbol table.
pub mod encoder;
/// Structured assembly error types.
pub mod errors;
/// Source line parser for labels, mnemonics, and operands.
pub mod parser;
/// Symbol table built during pass 1.
pub mod symbols;
/// Word-list text format reader/writer.
pub mod wordfile;

pub use assembler::assemble;
pub use errors::{AssembleError, AssembleErrorKind};
pub use wordfile::{format_words, parse_words, WordFileError};

#[cfg(test)]
use tempfile as _;
