//! Pass-2 encoding of parsed instructions into 32-bit words.
//!
//! Operand order follows conventional assembly (`add $rd, $rs, $rt`), while
//! the codec packs fields in encoding order. Branch targets encode as
//! `(target - (branch_address + 4)) / 4` and jump targets as `target >> 2`;
//! numeric operands in target position are taken as byte addresses for `j`
//! and as ready-made word offsets for `beq`.

use sim_core::isa::{encode_immediate, encode_jump, encode_register, RegisterOp};
use sim_core::{HALT_WORD, OP_ADDI, OP_BEQ, OP_J, OP_LW, OP_SW};

use crate::errors::AssembleErrorKind;
use crate::parser::Operand;
use crate::symbols::SymbolTable;

const IMM_MIN: i64 = i16::MIN as i64;
const IMM_MAX: i64 = i16::MAX as i64;

fn expect_operands(
    mnemonic: &str,
    operands: &[Operand],
    expected: usize,
) -> Result<(), AssembleErrorKind> {
    if operands.len() == expected {
        Ok(())
    } else {
        Err(AssembleErrorKind::BadOperandCount {
            mnemonic: mnemonic.to_owned(),
            expected,
            found: operands.len(),
        })
    }
}

fn expect_register(operand: &Operand) -> Result<u8, AssembleErrorKind> {
    match operand {
        Operand::Register(index) => Ok(*index),
        other => Err(AssembleErrorKind::BadOperand(format!(
            "expected a register, found {other:?}"
        ))),
    }
}

fn expect_immediate_field(value: i64) -> Result<i32, AssembleErrorKind> {
    if (IMM_MIN..=IMM_MAX).contains(&value) {
        Ok(value as i32)
    } else {
        Err(AssembleErrorKind::ImmediateOutOfRange(value))
    }
}

fn resolve_target(operand: &Operand, symbols: &SymbolTable) -> Result<u32, AssembleErrorKind> {
    match operand {
        Operand::Label(name) => symbols
            .resolve(name)
            .ok_or_else(|| AssembleErrorKind::UnresolvedLabel(name.clone())),
        other => Err(AssembleErrorKind::BadOperand(format!(
            "expected a label, found {other:?}"
        ))),
    }
}

fn encode_branch(
    rs: u8,
    rt: u8,
    target: &Operand,
    pc: u32,
    symbols: &SymbolTable,
) -> Result<u32, AssembleErrorKind> {
    let offset_words = match target {
        Operand::Immediate(value) => *value,
        _ => {
            let address = resolve_target(target, symbols)?;
            (i64::from(address) - (i64::from(pc) + 4)) / 4
        }
    };
    let imm = expect_immediate_field(offset_words)?;
    Ok(encode_immediate(OP_BEQ, rs, rt, imm))
}

fn encode_jump_target(
    target: &Operand,
    symbols: &SymbolTable,
) -> Result<u32, AssembleErrorKind> {
    let address = match target {
        Operand::Immediate(value) => {
            u32::try_from(*value).map_err(|_| AssembleErrorKind::ImmediateOutOfRange(*value))?
        }
        _ => resolve_target(target, symbols)?,
    };
    Ok(encode_jump(OP_J, address >> 2))
}

/// Encodes one parsed instruction at `pc` into its 32-bit word.
///
/// # Errors
///
/// Returns the error kind for unknown mnemonics, malformed or miscounted
/// operands, unresolved labels, and out-of-range immediates.
pub fn encode_instruction(
    mnemonic: &str,
    operands: &[Operand],
    pc: u32,
    symbols: &SymbolTable,
) -> Result<u32, AssembleErrorKind> {
    if let Some(op) = RegisterOp::from_mnemonic(mnemonic) {
        expect_operands(mnemonic, operands, 3)?;
        let rd = expect_register(&operands[0])?;
        let rs = expect_register(&operands[1])?;
        let rt = expect_register(&operands[2])?;
        return Ok(encode_register(rs, rt, rd, 0, op.funct()));
    }

    match mnemonic {
        "addi" => {
            expect_operands(mnemonic, operands, 3)?;
            let rt = expect_register(&operands[0])?;
            let rs = expect_register(&operands[1])?;
            let imm = match &operands[2] {
                Operand::Immediate(value) => expect_immediate_field(*value)?,
                other => {
                    return Err(AssembleErrorKind::BadOperand(format!(
                        "expected an immediate, found {other:?}"
                    )))
                }
            };
            Ok(encode_immediate(OP_ADDI, rs, rt, imm))
        }
        "lw" | "sw" => {
            expect_operands(mnemonic, operands, 2)?;
            let rt = expect_register(&operands[0])?;
            let (offset, base) = match &operands[1] {
                Operand::Memory { offset, base } => (*offset, *base),
                other => {
                    return Err(AssembleErrorKind::BadOperand(format!(
                        "expected offset(base), found {other:?}"
                    )))
                }
            };
            let imm = expect_immediate_field(offset)?;
            let opcode = if mnemonic == "lw" { OP_LW } else { OP_SW };
            Ok(encode_immediate(opcode, base, rt, imm))
        }
        "beq" => {
            expect_operands(mnemonic, operands, 3)?;
            let rs = expect_register(&operands[0])?;
            let rt = expect_register(&operands[1])?;
            encode_branch(rs, rt, &operands[2], pc, symbols)
        }
        "j" => {
            expect_operands(mnemonic, operands, 1)?;
            encode_jump_target(&operands[0], symbols)
        }
        "halt" => {
            expect_operands(mnemonic, operands, 0)?;
            Ok(HALT_WORD)
        }
        other => Err(AssembleErrorKind::UnknownMnemonic(other.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::encode_instruction;
    use crate::errors::AssembleErrorKind;
    use crate::parser::Operand;
    use crate::symbols::SymbolTable;
    use sim_core::isa::{encode_immediate, encode_jump, encode_register};
    use sim_core::{FUNCT_ADD, HALT_WORD, OP_ADDI, OP_BEQ, OP_J};

    #[test]
    fn register_form_reorders_rd_rs_rt_into_encoding_order() {
        let word = encode_instruction(
            "add",
            &[
                Operand::Register(10),
                Operand::Register(8),
                Operand::Register(9),
            ],
            0,
            &SymbolTable::new(),
        )
        .unwrap();
        assert_eq!(word, encode_register(8, 9, 10, 0, FUNCT_ADD));
    }

    #[test]
    fn backward_branch_encodes_negative_word_offset() {
        let mut symbols = SymbolTable::new();
        symbols.define("loop", 0).unwrap();
        // beq at address 8: offset = (0 - 12) / 4 = -3.
        let word = encode_instruction(
            "beq",
            &[
                Operand::Register(8),
                Operand::Register(0),
                Operand::Label("loop".into()),
            ],
            8,
            &symbols,
        )
        .unwrap();
        assert_eq!(word, encode_immediate(OP_BEQ, 8, 0, -3));
    }

    #[test]
    fn jump_encodes_word_granular_address_field() {
        let mut symbols = SymbolTable::new();
        symbols.define("start", 0x40).unwrap();
        let word = encode_instruction(
            "j",
            &[Operand::Label("start".into())],
            0,
            &symbols,
        )
        .unwrap();
        assert_eq!(word, encode_jump(OP_J, 0x10));
    }

    #[test]
    fn halt_takes_no_operands() {
        assert_eq!(
            encode_instruction("halt", &[], 0, &SymbolTable::new()),
            Ok(HALT_WORD)
        );
        assert_eq!(
            encode_instruction("halt", &[Operand::Register(1)], 0, &SymbolTable::new()),
            Err(AssembleErrorKind::BadOperandCount {
                mnemonic: "halt".into(),
                expected: 0,
                found: 1,
            })
        );
    }

    #[test]
    fn addi_rejects_immediates_wider_than_16_bits() {
        let result = encode_instruction(
            "addi",
            &[
                Operand::Register(8),
                Operand::Register(0),
                Operand::Immediate(40000),
            ],
            0,
            &SymbolTable::new(),
        );
        assert_eq!(result, Err(AssembleErrorKind::ImmediateOutOfRange(40000)));
    }

    #[test]
    fn addi_encodes_register_and_immediate_fields() {
        let word = encode_instruction(
            "addi",
            &[
                Operand::Register(8),
                Operand::Register(0),
                Operand::Immediate(5),
            ],
            0,
            &SymbolTable::new(),
        )
        .unwrap();
        assert_eq!(word, encode_immediate(OP_ADDI, 0, 8, 5));
    }

    #[test]
    fn unresolved_label_reports_its_name() {
        let result = encode_instruction(
            "j",
            &[Operand::Label("nowhere".into())],
            0,
            &SymbolTable::new(),
        );
        assert_eq!(
            result,
            Err(AssembleErrorKind::UnresolvedLabel("nowhere".into()))
        );
    }

    #[test]
    fn unknown_mnemonic_is_rejected() {
        assert_eq!(
            encode_instruction("mul", &[], 0, &SymbolTable::new()),
            Err(AssembleErrorKind::UnknownMnemonic("mul".into()))
        );
    }
}
