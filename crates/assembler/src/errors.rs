//! Structured error reporting for the assembler.
//!
//! Errors format in the conventional `line: error: message` style so the
//! CLI can prefix them with the input path:
//!
//! ```text
//! program.asm:12: error: unknown mnemonic 'foo'
//! ```

use std::error::Error;
use std::fmt;

/// Classification of assembly failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembleErrorKind {
    /// Mnemonic is not in the supported set.
    UnknownMnemonic(String),
    /// Register operand does not name a register.
    UnknownRegister(String),
    /// Branch or jump target references an undeclared label.
    UnresolvedLabel(String),
    /// Label declared more than once.
    DuplicateLabel(String),
    /// Operand count does not match the mnemonic's form.
    BadOperandCount {
        /// Mnemonic as written.
        mnemonic: String,
        /// Operands the form requires.
        expected: usize,
        /// Operands found on the line.
        found: usize,
    },
    /// Operand has the wrong shape for its position.
    BadOperand(String),
    /// Immediate does not fit the 16-bit field.
    ImmediateOutOfRange(i64),
}

impl fmt::Display for AssembleErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMnemonic(name) => write!(f, "unknown mnemonic '{name}'"),
            Self::UnknownRegister(name) => write!(f, "unknown register '{name}'"),
            Self::UnresolvedLabel(name) => write!(f, "unresolved label '{name}'"),
            Self::DuplicateLabel(name) => write!(f, "duplicate label '{name}'"),
            Self::BadOperandCount {
                mnemonic,
                expected,
                found,
            } => write!(f, "'{mnemonic}' expects {expected} operands, found {found}"),
            Self::BadOperand(detail) => write!(f, "bad operand: {detail}"),
            Self::ImmediateOutOfRange(value) => {
                write!(f, "immediate {value} does not fit in 16 bits")
            }
        }
    }
}

/// An assembly failure tied to its 1-indexed source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleError {
    /// 1-indexed source line.
    pub line: usize,
    /// What went wrong.
    pub kind: AssembleErrorKind,
}

impl AssembleError {
    /// Ties an error kind to a source line.
    #[must_use]
    pub const fn new(line: usize, kind: AssembleErrorKind) -> Self {
        Self { line, kind }
    }
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: error: {}", self.line, self.kind)
    }
}

impl Error for AssembleError {}
