//! Operand-shape resolution: given a mnemonic and its operand kinds, picks
//! the addressing mode — the one computation the semantic validator (C2),
//! the sizer (C3) and the encoder (C5) all share (spec §4.3: the sizer's
//! byte length "is derived from the mode the encoder will select, which is
//! itself determined by the operand kinds").

use jasm_isa::{Mode, OpCode};

use crate::ast::Operand;
use crate::error::{AsmError, Result};

fn expect_count(op: OpCode, operands: &[Operand], n: usize, line: u32) -> Result<()> {
    if operands.len() != n {
        return Err(AsmError::WrongOperandCount {
            line,
            mnemonic: op.mnemonic(),
            expected: n,
            found: operands.len(),
        });
    }
    Ok(())
}

fn kind_err(op: OpCode, position: usize, expected: &'static str, found: &Operand, line: u32) -> AsmError {
    AsmError::WrongOperandKind {
        line,
        mnemonic: op.mnemonic(),
        position,
        expected,
        found: found.kind_name(),
    }
}

/// dest register; rhs = register or imm8 (MOVE, ADD family, bitwise family, CMP).
fn reg_then_reg_or_imm(op: OpCode, operands: &[Operand], line: u32) -> Result<Mode> {
    expect_count(op, operands, 2, line)?;
    match (&operands[0], &operands[1]) {
        (Operand::Register(_), Operand::Register(_)) => Ok(Mode::RegReg),
        (Operand::Register(_), Operand::Number(_)) => Ok(Mode::RegImm8),
        (Operand::Register(_), other) => Err(kind_err(op, 2, "REGISTER or NUMBER", other, line)),
        (other, _) => Err(kind_err(op, 1, "REGISTER", other, line)),
    }
}

/// port = register or imm8; source register (OUTB only — operand order is
/// reversed relative to the usual dest-first convention, see DESIGN.md).
fn reg_or_imm_then_reg(op: OpCode, operands: &[Operand], line: u32) -> Result<Mode> {
    expect_count(op, operands, 2, line)?;
    match (&operands[0], &operands[1]) {
        (Operand::Register(_), Operand::Register(_)) => Ok(Mode::RegReg),
        (Operand::Number(_), Operand::Register(_)) => Ok(Mode::RegImm8),
        (_, Operand::Register(_)) => Err(kind_err(op, 1, "REGISTER or NUMBER", &operands[0], line)),
        (_, other) => Err(kind_err(op, 2, "REGISTER", other, line)),
    }
}

/// dest register; source = absolute address (NUMBER/LABELNAME) or register pair.
fn reg_then_addr(op: OpCode, operands: &[Operand], line: u32) -> Result<Mode> {
    expect_count(op, operands, 2, line)?;
    match (&operands[0], &operands[1]) {
        (Operand::Register(_), Operand::Number(_)) | (Operand::Register(_), Operand::Label(_)) => {
            Ok(Mode::RegAbs16)
        }
        (Operand::Register(_), Operand::RegisterPair(_, _)) => Ok(Mode::RegPair),
        (Operand::Register(_), other) => {
            Err(kind_err(op, 2, "NUMBER, LABELNAME or REGISTER_PAIR", other, line))
        }
        (other, _) => Err(kind_err(op, 1, "REGISTER", other, line)),
    }
}

/// register or imm8 (PUSH).
fn reg_or_imm(op: OpCode, operands: &[Operand], line: u32) -> Result<Mode> {
    expect_count(op, operands, 1, line)?;
    match &operands[0] {
        Operand::Register(_) => Ok(Mode::SingleReg),
        Operand::Number(_) => Ok(Mode::Imm8Only),
        other => Err(kind_err(op, 1, "REGISTER or NUMBER", other, line)),
    }
}

/// bare register (POP, INC, DEC, NOT).
fn single_reg(op: OpCode, operands: &[Operand], line: u32) -> Result<Mode> {
    expect_count(op, operands, 1, line)?;
    match &operands[0] {
        Operand::Register(_) => Ok(Mode::SingleReg),
        other => Err(kind_err(op, 1, "REGISTER", other, line)),
    }
}

/// no operands (SEC, CLC, CLZ, NOP, HALT).
fn no_operands(op: OpCode, operands: &[Operand], line: u32) -> Result<Mode> {
    expect_count(op, operands, 0, line)?;
    Ok(Mode::NoOperands)
}

/// absolute-16 (NUMBER/LABELNAME) or register pair (JMP and friends).
fn target(op: OpCode, operands: &[Operand], line: u32) -> Result<Mode> {
    expect_count(op, operands, 1, line)?;
    match &operands[0] {
        Operand::Number(_) | Operand::Label(_) => Ok(Mode::Abs16Only),
        Operand::RegisterPair(_, _) => Ok(Mode::RegPair),
        other => Err(kind_err(op, 1, "NUMBER, LABELNAME or REGISTER_PAIR", other, line)),
    }
}

/// bare imm8 (INT).
fn imm_only(op: OpCode, operands: &[Operand], line: u32) -> Result<Mode> {
    expect_count(op, operands, 1, line)?;
    match &operands[0] {
        Operand::Number(_) => Ok(Mode::Imm8Only),
        other => Err(kind_err(op, 1, "NUMBER", other, line)),
    }
}

/// Validates operand count/kind for `op` and returns the mode the encoder
/// will use, per the table in spec §4.1.
pub fn resolve_mode(op: OpCode, operands: &[Operand], line: u32) -> Result<Mode> {
    use OpCode::*;
    match op {
        Load | Store => reg_then_addr(op, operands, line),
        Move => reg_then_reg_or_imm(op, operands, line),
        Push => reg_or_imm(op, operands, line),
        Pop | Inc | Dec | Not => single_reg(op, operands, line),
        Add | Addc | Sub | Subb | Shl | Shr | And | Or | Nor | Xor | Inb | Cmp => {
            reg_then_reg_or_imm(op, operands, line)
        }
        Outb => reg_or_imm_then_reg(op, operands, line),
        Sec | Clc | Clz | Nop | Halt => no_operands(op, operands, line),
        Jmp | Jz | Jnz | Jc | Jnc => target(op, operands, line),
        Int => imm_only(op, operands, line),
    }
}
