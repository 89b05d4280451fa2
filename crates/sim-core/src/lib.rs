//! Single-cycle MIPS-subset execution core.
//!
//! The crate models a teaching datapath: a bit-level instruction codec, a
//! stateless 32-bit ALU, byte-addressable big-endian memory, a 32-entry
//! register file with a hardwired zero register, per-category statistics,
//! and the engine that drives one fetch-decode-execute-writeback cycle per
//! `step`. Front ends (assembler, interactive driver, views) live in
//! sibling crates and talk to the engine through `load`, `step`/`run`, and
//! the cycle observer hook.

/// Stateless 32-bit arithmetic-logic unit.
pub mod alu;
pub use alu::AluOp;

/// Fetch-decode-execute-writeback engine and observer hook.
pub mod engine;
pub use engine::{CycleSnapshot, Engine, NextPc, Observer, RunState, WORD_BYTES};

/// Fault taxonomy for memory and dispatch violations.
pub mod fault;
pub use fault::Fault;

/// Instruction codec: bit layouts, decode, and masking encoders.
pub mod isa;
pub use isa::{
    decode, encode_immediate, encode_jump, encode_register, sign_extend_16, ImmediateOp,
    Instruction, RegisterOp, FUNCT_ADD, FUNCT_AND, FUNCT_OR, FUNCT_SLT, FUNCT_SUB, HALT_WORD,
    OP_ADDI, OP_BEQ, OP_J, OP_LW, OP_RTYPE, OP_SW,
};

/// Byte-addressable memory with aligned-word access.
pub mod memory;
pub use memory::{Memory, DEFAULT_MEMORY_BYTES};

/// General-purpose register file.
pub mod registers;
pub use registers::{RegisterFile, REGISTER_COUNT};

/// Increment-only execution statistics.
pub mod stats;
pub use stats::Statistics;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
