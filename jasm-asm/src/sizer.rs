//! C3: byte length of an instruction, derived from the mode the encoder
//! will pick for it.

use crate::ast::Operand;
use crate::error::Result;
use crate::shape::resolve_mode;
use jasm_isa::OpCode;

pub fn instruction_len(mnemonic: OpCode, operands: &[Operand], line: u32) -> Result<u16> {
    let mode = resolve_mode(mnemonic, operands, line)?;
    Ok(mode.encoded_len() as u16)
}
