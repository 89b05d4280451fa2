//! Instruction codec for the MIPS-subset ISA.
//!
//! Three encoding classes share the 32-bit word:
//!
//! - Register type: `opcode(6)=0 | rs(5) | rt(5) | rd(5) | shamt(5) | funct(6)`
//! - Immediate type: `opcode(6) | rs(5) | rt(5) | imm(16)`
//! - Jump type: `opcode(6) | address(26)`
//!
//! The all-ones word is the halt sentinel and takes priority over every
//! field-level rule. Decoding is infallible: words with an unassigned opcode
//! or register-type function code decode to an unknown form that the engine
//! rejects at execute time.

use crate::alu::AluOp;

/// Primary opcode value shared by all register-type instructions.
pub const OP_RTYPE: u8 = 0x00;
/// Primary opcode for `j`.
pub const OP_J: u8 = 0x02;
/// Primary opcode for `beq`.
pub const OP_BEQ: u8 = 0x04;
/// Primary opcode for `addi`.
pub const OP_ADDI: u8 = 0x08;
/// Primary opcode for `lw`.
pub const OP_LW: u8 = 0x23;
/// Primary opcode for `sw`.
pub const OP_SW: u8 = 0x2B;

/// Function code for `add`.
pub const FUNCT_ADD: u8 = 0x20;
/// Function code for `sub`.
pub const FUNCT_SUB: u8 = 0x22;
/// Function code for `and`.
pub const FUNCT_AND: u8 = 0x24;
/// Function code for `or`.
pub const FUNCT_OR: u8 = 0x25;
/// Function code for `slt`.
pub const FUNCT_SLT: u8 = 0x2A;

/// Halt sentinel word, decoded ahead of any field extraction.
pub const HALT_WORD: u32 = 0xFFFF_FFFF;

/// Register-type operations with assigned function codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum RegisterOp {
    Add,
    Sub,
    And,
    Or,
    Slt,
}

impl RegisterOp {
    /// Resolves a 6-bit function code to an assigned register-type operation.
    ///
    /// `None` means the function code is unassigned; the word still decodes,
    /// and the engine faults when asked to execute it.
    #[must_use]
    pub const fn from_funct(funct: u8) -> Option<Self> {
        match funct {
            FUNCT_ADD => Some(Self::Add),
            FUNCT_SUB => Some(Self::Sub),
            FUNCT_AND => Some(Self::And),
            FUNCT_OR => Some(Self::Or),
            FUNCT_SLT => Some(Self::Slt),
            _ => None,
        }
    }

    /// Returns the 6-bit function code for this operation.
    #[must_use]
    pub const fn funct(self) -> u8 {
        match self {
            Self::Add => FUNCT_ADD,
            Self::Sub => FUNCT_SUB,
            Self::And => FUNCT_AND,
            Self::Or => FUNCT_OR,
            Self::Slt => FUNCT_SLT,
        }
    }

    /// Returns the assembly mnemonic for this operation.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::And => "and",
            Self::Or => "or",
            Self::Slt => "slt",
        }
    }

    /// Resolves an assembly mnemonic to its register-type operation.
    #[must_use]
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        match mnemonic {
            "add" => Some(Self::Add),
            "sub" => Some(Self::Sub),
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "slt" => Some(Self::Slt),
            _ => None,
        }
    }

    /// Returns the ALU operation backing this instruction.
    #[must_use]
    pub const fn alu_op(self) -> AluOp {
        match self {
            Self::Add => AluOp::Add,
            Self::Sub => AluOp::Sub,
            Self::And => AluOp::And,
            Self::Or => AluOp::Or,
            Self::Slt => AluOp::Slt,
        }
    }
}

/// Immediate-type operations with assigned primary opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum ImmediateOp {
    Addi,
    Lw,
    Sw,
    Beq,
}

impl ImmediateOp {
    /// Resolves a 6-bit primary opcode to an assigned immediate-type operation.
    #[must_use]
    pub const fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            OP_ADDI => Some(Self::Addi),
            OP_LW => Some(Self::Lw),
            OP_SW => Some(Self::Sw),
            OP_BEQ => Some(Self::Beq),
            _ => None,
        }
    }

    /// Returns the 6-bit primary opcode for this operation.
    #[must_use]
    pub const fn opcode(self) -> u8 {
        match self {
            Self::Addi => OP_ADDI,
            Self::Lw => OP_LW,
            Self::Sw => OP_SW,
            Self::Beq => OP_BEQ,
        }
    }

    /// Returns the assembly mnemonic for this operation.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Addi => "addi",
            Self::Lw => "lw",
            Self::Sw => "sw",
            Self::Beq => "beq",
        }
    }
}

/// A decoded instruction, produced fresh per fetch and discarded after execute.
///
/// Exactly one field grouping is populated per word, selected by opcode class.
/// The `Register` form keeps the raw function code alongside the resolved
/// operation so unassigned codes survive decode and re-encode intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Instruction {
    /// Register-type form (`opcode = 0`).
    Register {
        /// Resolved operation, `None` for an unassigned function code.
        op: Option<RegisterOp>,
        /// First source register index.
        rs: u8,
        /// Second source register index.
        rt: u8,
        /// Destination register index.
        rd: u8,
        /// Shift amount; unused by the assigned operations but round-trips.
        shamt: u8,
        /// Raw 6-bit function code.
        funct: u8,
    },
    /// Immediate-type form (`addi`, `lw`, `sw`, `beq`).
    Immediate {
        /// Resolved operation.
        op: ImmediateOp,
        /// Base/source register index.
        rs: u8,
        /// Target register index.
        rt: u8,
        /// Sign-extended 16-bit immediate.
        imm: i32,
    },
    /// Jump-type form (`j`).
    Jump {
        /// 26-bit word-granular target address field.
        target: u32,
    },
    /// Halt sentinel (`0xFFFF_FFFF`).
    Halt,
    /// Unassigned primary opcode; faults at execute time, not here.
    Unknown {
        /// Raw 6-bit primary opcode.
        opcode: u8,
    },
}

impl Instruction {
    /// Returns the retired-instruction mnemonic used for statistics keys.
    #[must_use]
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Self::Register { op: Some(op), .. } => op.mnemonic(),
            Self::Immediate { op, .. } => op.mnemonic(),
            Self::Jump { .. } => "j",
            Self::Halt => "halt",
            Self::Register { op: None, .. } | Self::Unknown { .. } => "unknown",
        }
    }
}

/// Sign-extends a 16-bit immediate field into a signed value.
#[must_use]
pub const fn sign_extend_16(value: u16) -> i32 {
    value as i16 as i32
}

/// Decodes a 32-bit instruction word into its structured form.
///
/// The halt sentinel is matched before any field extraction. Unassigned
/// opcodes and function codes decode to unknown forms rather than faulting.
#[must_use]
pub const fn decode(word: u32) -> Instruction {
    if word == HALT_WORD {
        return Instruction::Halt;
    }

    let opcode = ((word >> 26) & 0x3F) as u8;
    let rs = ((word >> 21) & 0x1F) as u8;
    let rt = ((word >> 16) & 0x1F) as u8;

    if opcode == OP_RTYPE {
        let funct = (word & 0x3F) as u8;
        return Instruction::Register {
            op: RegisterOp::from_funct(funct),
            rs,
            rt,
            rd: ((word >> 11) & 0x1F) as u8,
            shamt: ((word >> 6) & 0x1F) as u8,
            funct,
        };
    }

    if opcode == OP_J {
        return Instruction::Jump {
            target: word & 0x03FF_FFFF,
        };
    }

    match ImmediateOp::from_opcode(opcode) {
        Some(op) => Instruction::Immediate {
            op,
            rs,
            rt,
            imm: sign_extend_16((word & 0xFFFF) as u16),
        },
        None => Instruction::Unknown { opcode },
    }
}

/// Packs a register-type instruction word, masking each field to its width.
#[must_use]
pub const fn encode_register(rs: u8, rt: u8, rd: u8, shamt: u8, funct: u8) -> u32 {
    ((OP_RTYPE as u32) << 26)
        | (((rs & 0x1F) as u32) << 21)
        | (((rt & 0x1F) as u32) << 16)
        | (((rd & 0x1F) as u32) << 11)
        | (((shamt & 0x1F) as u32) << 6)
        | ((funct & 0x3F) as u32)
}

/// Packs an immediate-type instruction word, masking each field to its width.
#[must_use]
pub const fn encode_immediate(opcode: u8, rs: u8, rt: u8, imm: i32) -> u32 {
    (((opcode & 0x3F) as u32) << 26)
        | (((rs & 0x1F) as u32) << 21)
        | (((rt & 0x1F) as u32) << 16)
        | ((imm as u32) & 0xFFFF)
}

/// Packs a jump-type instruction word, masking the address to 26 bits.
#[must_use]
pub const fn encode_jump(opcode: u8, target: u32) -> u32 {
    (((opcode & 0x3F) as u32) << 26) | (target & 0x03FF_FFFF)
}
