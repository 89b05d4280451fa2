//! Fault taxonomy for the execution core.
//!
//! Faults are deterministic functions of engine state: the core never retries,
//! swallows, or auto-corrects one. Every fault aborts the current `step` or
//! `load` call and carries enough context to diagnose the access.

use thiserror::Error;

/// Faults raised by memory accesses and execute-time dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fault {
    /// Word-granular access whose address is not a multiple of four.
    #[error("misaligned word access at {addr:#010x}")]
    MisalignedAccess {
        /// Faulting address.
        addr: u32,
    },
    /// Access outside the configured memory bounds.
    #[error("out-of-bounds access at {addr:#010x} (memory size {size} bytes)")]
    OutOfBoundsAccess {
        /// Faulting address.
        addr: u32,
        /// Configured memory size in bytes.
        size: usize,
    },
    /// Decoded instruction carried a primary opcode outside the supported set.
    #[error("unknown opcode {opcode:#04x}")]
    UnknownOpcode {
        /// Raw 6-bit primary opcode.
        opcode: u8,
    },
    /// Register-type instruction carried an unassigned function code.
    #[error("unknown register-type function code {funct:#04x}")]
    UnknownFunct {
        /// Raw 6-bit function code.
        funct: u8,
    },
}
