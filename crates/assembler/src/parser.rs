//! Source line parser: comments, labels, mnemonics, and operand forms.
//!
//! One source line holds at most one item. `#` starts a comment, `name:`
//! declares a label, and everything else is `mnemonic op, op, ...` where an
//! operand is a register (`$t0` or `$r8`), an immediate (decimal or `0x`
//! hex), a memory operand (`imm($base)`), or a label reference.

use crate::errors::AssembleErrorKind;

/// Canonical register aliases, indexed by register number.
pub const REGISTER_ALIASES: [&str; 32] = [
    "$zero", "$at", "$v0", "$v1", "$a0", "$a1", "$a2", "$a3", "$t0", "$t1", "$t2", "$t3", "$t4",
    "$t5", "$t6", "$t7", "$s0", "$s1", "$s2", "$s3", "$s4", "$s5", "$s6", "$s7", "$t8", "$t9",
    "$k0", "$k1", "$gp", "$sp", "$fp", "$ra",
];

/// Resolves a register token (`$t0`, `$zero`, or numeric `$r8`) to its index.
#[must_use]
pub fn register_index(token: &str) -> Option<u8> {
    if let Some(position) = REGISTER_ALIASES.iter().position(|alias| *alias == token) {
        return u8::try_from(position).ok();
    }
    token
        .strip_prefix("$r")
        .and_then(|digits| digits.parse::<u8>().ok())
        .filter(|index| *index < 32)
}

/// A single parsed operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Register index 0–31.
    Register(u8),
    /// Immediate value; width-checked at encode time.
    Immediate(i64),
    /// Memory operand `offset(base)`.
    Memory {
        /// Signed byte offset.
        offset: i64,
        /// Base register index.
        base: u8,
    },
    /// Label reference, resolved in pass 2.
    Label(String),
}

/// A parsed source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Empty or comment-only line.
    Blank,
    /// Label declaration (`name:`).
    Label {
        /// Declared label name.
        name: String,
    },
    /// Instruction line.
    Instruction {
        /// Lower-cased mnemonic as written.
        mnemonic: String,
        /// Operands in source order.
        operands: Vec<Operand>,
    },
}

fn parse_immediate(token: &str) -> Option<i64> {
    let (digits, sign) = match token.strip_prefix('-') {
        Some(rest) => (rest, -1),
        None => (token, 1),
    };
    let value = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    Some(sign * value)
}

fn parse_operand(token: &str) -> Result<Operand, AssembleErrorKind> {
    if let Some(rest) = token.strip_suffix(')') {
        if let Some((offset_text, base_text)) = rest.split_once('(') {
            let offset = if offset_text.is_empty() {
                0
            } else {
                parse_immediate(offset_text).ok_or_else(|| {
                    AssembleErrorKind::BadOperand(format!("'{offset_text}' is not an offset"))
                })?
            };
            let base = register_index(base_text)
                .ok_or_else(|| AssembleErrorKind::UnknownRegister(base_text.to_owned()))?;
            return Ok(Operand::Memory { offset, base });
        }
    }

    if token.starts_with('$') {
        return register_index(token)
            .map(Operand::Register)
            .ok_or_else(|| AssembleErrorKind::UnknownRegister(token.to_owned()));
    }

    if token.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        return parse_immediate(token)
            .map(Operand::Immediate)
            .ok_or_else(|| AssembleErrorKind::BadOperand(format!("'{token}' is not a number")));
    }

    Ok(Operand::Label(token.to_owned()))
}

/// Parses one source line.
///
/// # Errors
///
/// Returns the operand-level error kind for malformed registers, numbers,
/// or memory operands; the caller attaches the line number.
pub fn parse_line(line: &str) -> Result<ParsedLine, AssembleErrorKind> {
    let code = line.split('#').next().unwrap_or("").trim();
    if code.is_empty() {
        return Ok(ParsedLine::Blank);
    }

    if let Some(name) = code.strip_suffix(':') {
        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(AssembleErrorKind::BadOperand(format!(
                "'{code}' is not a valid label declaration"
            )));
        }
        return Ok(ParsedLine::Label {
            name: name.to_owned(),
        });
    }

    let mut pieces = code.splitn(2, char::is_whitespace);
    let mnemonic = pieces
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let rest = pieces.next().unwrap_or("").trim();

    let operands = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split(',')
            .map(|token| parse_operand(token.trim()))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(ParsedLine::Instruction { mnemonic, operands })
}
