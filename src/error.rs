//! Emulator-side error types (C7/C8). Assembler-side errors live in the
//! `jasm-asm` crate, which depends on this one.

use thiserror::Error;

use crate::opcode::Mode;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    /// Raised only for hand-crafted byte streams: every 5-bit value (0..31)
    /// is assigned to a real opcode, so assembler output can never trigger
    /// this.
    #[error("unknown opcode {raw} at 0x{pc:04X}")]
    UnknownOpcode { raw: u8, pc: u16 },

    /// The decoded mode is not in the opcode's allowed-modes table. Also
    /// unreachable from assembler output; reachable from hand-crafted bytes.
    #[error("mode {mode:?} is not legal for opcode {mnemonic} at 0x{pc:04X}")]
    IllegalMode {
        mnemonic: &'static str,
        mode: Mode,
        pc: u16,
    },
}
