//! Stateless 32-bit arithmetic-logic unit.
//!
//! Every operation wraps silently at 32 bits; there is no overflow fault in
//! this datapath. `slt` reinterprets both operands as signed two's-complement
//! values before comparing.

/// ALU operations, keyed by the stable names used in statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum AluOp {
    Add,
    Sub,
    And,
    Or,
    Slt,
}

impl AluOp {
    /// Returns the stable statistics key for this operation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::And => "and",
            Self::Or => "or",
            Self::Slt => "slt",
        }
    }

    /// Applies this operation to two 32-bit operands.
    #[must_use]
    pub const fn apply(self, a: u32, b: u32) -> u32 {
        match self {
            Self::Add => add(a, b),
            Self::Sub => sub(a, b),
            Self::And => and(a, b),
            Self::Or => or(a, b),
            Self::Slt => slt(a, b),
        }
    }
}

/// Two's-complement addition with 32-bit wraparound.
#[must_use]
pub const fn add(a: u32, b: u32) -> u32 {
    a.wrapping_add(b)
}

/// Two's-complement subtraction with 32-bit wraparound.
#[must_use]
pub const fn sub(a: u32, b: u32) -> u32 {
    a.wrapping_sub(b)
}

/// Bitwise AND.
#[must_use]
pub const fn and(a: u32, b: u32) -> u32 {
    a & b
}

/// Bitwise OR.
#[must_use]
pub const fn or(a: u32, b: u32) -> u32 {
    a | b
}

/// Signed set-less-than: 1 when `a < b` as two's-complement values, else 0.
#[must_use]
pub const fn slt(a: u32, b: u32) -> u32 {
    ((a as i32) < (b as i32)) as u32
}
