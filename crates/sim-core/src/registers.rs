//! General-purpose register file with a hardwired zero register.

/// Number of architecturally visible general-purpose registers.
pub const REGISTER_COUNT: usize = 32;

/// Ordered file of 32 word-sized registers, indexed 0–31.
///
/// Register 0 always reads as zero and discards writes, matching the
/// hardwired `$zero` register. Every index is valid; decode produces
/// five-bit fields and wider indices are masked rather than faulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    regs: [u32; REGISTER_COUNT],
}

impl RegisterFile {
    /// Creates a zeroed register file.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            regs: [0; REGISTER_COUNT],
        }
    }

    /// Reads a register; index 0 always yields zero.
    #[must_use]
    pub const fn read(&self, index: u8) -> u32 {
        match index & 0x1F {
            0 => 0,
            masked => self.regs[masked as usize],
        }
    }

    /// Writes a register; writes to index 0 are discarded.
    pub const fn write(&mut self, index: u8, value: u32) {
        let masked = index & 0x1F;
        if masked != 0 {
            self.regs[masked as usize] = value;
        }
    }
}
