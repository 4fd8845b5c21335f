//! Assembler-side error taxonomy (spec §7, "Input errors"). All fatal at
//! first occurrence and carry a source line number.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("line {line}: {message}")]
    Parse { line: u32, message: String },

    #[error("line {line}: unknown mnemonic '{mnemonic}'")]
    UnknownMnemonic { line: u32, mnemonic: String },

    #[error("line {line}: duplicate label '{name}'")]
    DuplicateLabel { line: u32, name: String },

    #[error("line {line}: {mnemonic} takes {expected} operand(s), found {found}")]
    WrongOperandCount {
        line: u32,
        mnemonic: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: {mnemonic} operand {position}: expected {expected}, found {found}")]
    WrongOperandKind {
        line: u32,
        mnemonic: &'static str,
        position: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("line {line}: {value} is out of range for {context} ({min}..={max})")]
    OutOfRange {
        line: u32,
        value: i64,
        context: &'static str,
        min: i64,
        max: i64,
    },

    #[error("line {line}: undefined label '{name}'")]
    UndefinedLabel { line: u32, name: String },
}

pub type Result<T> = std::result::Result<T, AsmError>;
