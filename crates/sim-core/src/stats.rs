//! Per-category operation statistics for the execution engine.
//!
//! Counters are increment-only and mutated exclusively by the engine during
//! `step`; external consumers get read-only snapshot values. Resetting means
//! creating a fresh engine.

use std::collections::BTreeMap;

use crate::alu::AluOp;

/// Monotonic cycle, access, and category counters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Statistics {
    cycles: u64,
    instruction_fetches: u64,
    data_reads: u64,
    data_writes: u64,
    alu_ops: BTreeMap<String, u64>,
    retired: BTreeMap<String, u64>,
}

impl Statistics {
    /// Creates a zeroed statistics block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed simulation cycles.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Instruction words fetched from memory.
    #[must_use]
    pub const fn instruction_fetches(&self) -> u64 {
        self.instruction_fetches
    }

    /// Data-memory word reads performed by `lw`.
    #[must_use]
    pub const fn data_reads(&self) -> u64 {
        self.data_reads
    }

    /// Data-memory word writes performed by `sw`.
    #[must_use]
    pub const fn data_writes(&self) -> u64 {
        self.data_writes
    }

    /// Per-operation ALU usage counts, keyed by stable operation name.
    #[must_use]
    pub const fn alu_ops(&self) -> &BTreeMap<String, u64> {
        &self.alu_ops
    }

    /// Retired-instruction counts, keyed by mnemonic.
    #[must_use]
    pub const fn retired(&self) -> &BTreeMap<String, u64> {
        &self.retired
    }

    pub(crate) const fn record_cycle(&mut self) {
        self.cycles += 1;
    }

    pub(crate) const fn record_instruction_fetch(&mut self) {
        self.instruction_fetches += 1;
    }

    pub(crate) const fn record_data_read(&mut self) {
        self.data_reads += 1;
    }

    pub(crate) const fn record_data_write(&mut self) {
        self.data_writes += 1;
    }

    pub(crate) fn record_alu_op(&mut self, op: AluOp) {
        *self.alu_ops.entry(op.name().to_owned()).or_insert(0) += 1;
    }

    pub(crate) fn record_retired(&mut self, mnemonic: &str) {
        *self.retired.entry(mnemonic.to_owned()).or_insert(0) += 1;
    }
}
